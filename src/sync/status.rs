use anyhow::Result;
use colored::Colorize;
use walkdir::WalkDir;

use crate::classify::{classify, ResourceKind};

use super::SyncSession;

/// Report the local artifact tree against the record maps: which files are
/// tracked, which are untracked, and which records have lost their local
/// file.
pub fn show_status(session: &SyncSession) -> Result<()> {
    println!(
        "{} {}",
        "Instance:".cyan().bold(),
        session.store.config.instance_id
    );

    let mut tracked = 0usize;
    let mut untracked: Vec<String> = Vec::new();

    for entry in WalkDir::new(session.workspace.artifact_root())
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
    {
        let Some(details) = classify(&entry.path().to_string_lossy()) else {
            continue;
        };
        if session.store.get(details.kind, &details.key).is_some() {
            tracked += 1;
        } else {
            untracked.push(format!("{} ({})", details.key, details.kind));
        }
    }

    println!("\n{}", "Resources:".bold());
    for kind in ResourceKind::all() {
        let count = session.store.record_count(kind);
        let missing = session
            .store
            .records(kind)
            .filter(|(key, _)| !session.workspace.local_path(kind, key).is_file())
            .count();
        if missing > 0 {
            println!(
                "  {kind}s: {count} tracked, {} local file(s) missing",
                missing.to_string().yellow()
            );
        } else {
            println!("  {kind}s: {count} tracked");
        }
    }

    println!("\n  {} local file(s) tracked", tracked.to_string().green());
    if untracked.is_empty() {
        println!("  no untracked files");
    } else {
        println!(
            "  {} untracked file(s):",
            untracked.len().to_string().yellow()
        );
        for name in untracked {
            println!("    {}", name.dimmed());
        }
    }

    Ok(())
}
