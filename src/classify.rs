use serde::{Deserialize, Serialize};

/// Name of the artifact root directory inside the managed workspace.
pub const ARTIFACT_ROOT: &str = "webengine";

/// Name of the persisted instance state file at the workspace root.
pub const INSTANCE_FILE: &str = "webengine.json";

/// Extensions that map to a non-view resource kind. Anything else, including
/// extensionless files, is a view.
const STYLE_EXTENSIONS: [&str; 4] = ["css", "less", "scss", "sass"];

/// The kind of a remote resource, derived purely from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    View,
    Stylesheet,
    Script,
}

impl ResourceKind {
    /// Derive the kind from an optional file extension. Pure function: a
    /// given key can only change kind by being recreated with a different
    /// extension.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some(ext) if STYLE_EXTENSIONS.contains(&ext) => ResourceKind::Stylesheet,
            Some("js") => ResourceKind::Script,
            _ => ResourceKind::View,
        }
    }

    /// Subdirectory of the artifact root holding local files of this kind.
    pub fn artifact_dir(&self) -> &'static str {
        match self {
            ResourceKind::View => "views",
            ResourceKind::Stylesheet => "styles",
            ResourceKind::Script => "scripts",
        }
    }

    /// Whether the remote publish call for this kind requires a version
    /// token. Scripts publish by identifier alone.
    pub fn requires_version_token(&self) -> bool {
        match self {
            ResourceKind::View | ResourceKind::Stylesheet => true,
            ResourceKind::Script => false,
        }
    }

    /// Remote subtype string used when creating a resource of this kind.
    ///
    /// Extensionless views become snippets; views with an unrecognized
    /// extension fall back to the generic page-view subtype.
    pub fn create_subtype(&self, extension: Option<&str>) -> String {
        match self {
            ResourceKind::Stylesheet => format!("text/{}", extension.unwrap_or("css")),
            ResourceKind::Script => "text/javascript".to_string(),
            ResourceKind::View => match extension {
                None => "snippet".to_string(),
                Some(_) => "ajax-json".to_string(),
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::View => "view",
            ResourceKind::Stylesheet => "stylesheet",
            ResourceKind::Script => "script",
        }
    }

    pub fn all() -> [ResourceKind; 3] {
        [
            ResourceKind::View,
            ResourceKind::Stylesheet,
            ResourceKind::Script,
        ]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classification of a local file path: the canonical resource key, the
/// derived kind, and the raw extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    /// Canonical relative key, unique per resource kind. View keys carry a
    /// leading slash when the file has an extension, matching the remote
    /// system's fileName convention.
    pub key: String,
    pub kind: ResourceKind,
    pub extension: Option<String>,
}

/// Extract the extension from a filename, `None` for extensionless files.
pub fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let mut parts = name.rsplitn(2, '.');
    let ext = parts.next()?;
    // A '.' must exist somewhere for the last segment to be an extension.
    parts.next()?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

/// Classify a file-system path into a managed resource, or `None` when the
/// path lies outside the artifact root or names the instance state file.
///
/// Pure function: separators are canonicalized and the artifact-root prefix
/// is stripped before the key is computed, so the same logical resource maps
/// to the same key regardless of how the path was obtained.
pub fn classify(path: &str) -> Option<FileDetails> {
    let canonical = path.replace('\\', "/");
    let mut segments: Vec<&str> = canonical.split('/').filter(|s| !s.is_empty()).collect();

    let root_idx = segments.iter().position(|s| *s == ARTIFACT_ROOT)?;
    segments.drain(..=root_idx);

    // The kind subdirectory is organizational only; kind itself comes from
    // the extension.
    if let Some(first) = segments.first() {
        if ["views", "styles", "scripts"].contains(first) {
            segments.remove(0);
        }
    }

    if segments.is_empty() {
        return None;
    }

    let filename = segments.join("/");
    if filename == INSTANCE_FILE {
        return None;
    }

    let extension = extension_of(&filename);
    let kind = ResourceKind::from_extension(extension.as_deref());

    // Views with a real extension are keyed with a leading slash, the way
    // the remote system reports their fileName.
    let key = if kind == ResourceKind::View && extension.is_some() {
        format!("/{filename}")
    } else {
        filename
    };

    Some(FileDetails {
        key,
        kind,
        extension,
    })
}
