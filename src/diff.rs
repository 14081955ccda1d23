//! Remote-vs-local comparison output for conflict and publish prompts.

use similar::TextDiff;

/// Render a unified diff between the remote and local copies of a resource.
///
/// Returns `None` when the contents are identical after line-ending
/// normalization.
pub fn unified(filename: &str, remote: &str, local: &str) -> Option<String> {
    let remote = normalize_line_endings(remote);
    let local = normalize_line_endings(local);
    if remote == local {
        return None;
    }

    let old_header = format!("remote/{}", filename.trim_start_matches('/'));
    let new_header = format!("local/{}", filename.trim_start_matches('/'));
    let diff = TextDiff::from_lines(&remote, &local)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Some(diff)
}

/// Print a diff to stdout with a title line.
pub fn print(filename: &str, remote: &str, local: &str) {
    match unified(filename, remote, local) {
        Some(diff) => {
            println!("Remote <-> Local ({filename})");
            print!("{diff}");
        }
        None => println!("No differences for {filename}."),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
