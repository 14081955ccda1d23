use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{ResourceKind, ARTIFACT_ROOT, INSTANCE_FILE};

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/webengine-sync or ~/.config/webengine-sync
    /// - macOS: ~/Library/Application Support/webengine-sync
    /// - Windows: %APPDATA%\webengine-sync
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join("webengine-sync"))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join("webengine-sync"))
            }
        }

        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home
                .join("Library")
                .join("Application Support")
                .join("webengine-sync"))
        }

        #[cfg(target_os = "windows")]
        {
            Ok(dirs::config_dir()
                .context("Failed to get Windows config directory")?
                .join("webengine-sync"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join(".webengine-sync"))
        }
    }

    /// Get the settings file path (config.toml)
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("webengine-sync.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// A managed workspace: the directory holding the instance state file and
/// the `webengine/` artifact tree.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn at(root: &Path) -> Self {
        Workspace {
            root: root.to_path_buf(),
        }
    }

    /// Find the workspace root by walking up from `start` until a directory
    /// containing the instance file is found.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut dir = start.to_path_buf();
        loop {
            if dir.join(INSTANCE_FILE).is_file() {
                return Ok(Workspace { root: dir });
            }
            if !dir.pop() {
                return Err(anyhow!(
                    "No {} found in {} or any parent directory. Run 'webengine-sync init' first.",
                    INSTANCE_FILE,
                    start.display()
                ));
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn instance_file(&self) -> PathBuf {
        self.root.join(INSTANCE_FILE)
    }

    pub fn artifact_root(&self) -> PathBuf {
        self.root.join(ARTIFACT_ROOT)
    }

    pub fn kind_dir(&self, kind: ResourceKind) -> PathBuf {
        self.artifact_root().join(kind.artifact_dir())
    }

    /// Local file path backing a resource key. View keys may carry a leading
    /// slash; it is stripped before joining.
    pub fn local_path(&self, kind: ResourceKind, key: &str) -> PathBuf {
        let relative = key.strip_prefix('/').unwrap_or(key);
        self.kind_dir(kind).join(relative)
    }

    /// Create the artifact root and its per-kind subdirectories.
    pub fn ensure_folders(&self) -> Result<()> {
        for kind in ResourceKind::all() {
            let dir = self.kind_dir(kind);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Write a file under the artifact tree, creating parent directories as
    /// needed (resource keys can contain subdirectories).
    pub fn write_artifact(&self, kind: ResourceKind, key: &str, content: &str) -> Result<PathBuf> {
        let path = self.local_path(kind, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(path)
    }

    /// Keep the instance file out of version control. Only writes a fresh
    /// .gitignore; an existing one is left alone.
    pub fn ensure_gitignore(&self) -> Result<()> {
        let path = self.root.join(".gitignore");
        if !path.exists() {
            fs::write(&path, format!("{INSTANCE_FILE}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_paths_contain_tool_name() {
        let config_dir = ConfigManager::config_dir().unwrap();
        assert!(config_dir.to_string_lossy().contains("webengine-sync"));

        let settings = ConfigManager::settings_path().unwrap();
        assert!(settings.to_string_lossy().contains("config.toml"));

        let log = ConfigManager::log_file_path().unwrap();
        assert!(log.to_string_lossy().contains("webengine-sync.log"));
    }

    #[test]
    fn discover_walks_up_to_the_instance_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(INSTANCE_FILE), "{}").unwrap();
        let nested = dir.path().join("webengine").join("views");
        fs::create_dir_all(&nested).unwrap();

        let ws = Workspace::discover(&nested).unwrap();
        assert_eq!(ws.root(), dir.path());
    }

    #[test]
    fn discover_fails_outside_a_workspace() {
        let dir = TempDir::new().unwrap();
        let err = Workspace::discover(dir.path()).unwrap_err();
        assert!(err.to_string().contains("init"));
    }

    #[test]
    fn local_path_strips_leading_slash_from_view_keys() {
        let ws = Workspace::at(Path::new("/work/site"));
        assert_eq!(
            ws.local_path(ResourceKind::View, "/home.html"),
            Path::new("/work/site/webengine/views/home.html")
        );
        assert_eq!(
            ws.local_path(ResourceKind::Stylesheet, "themes/dark.css"),
            Path::new("/work/site/webengine/styles/themes/dark.css")
        );
    }

    #[test]
    fn ensure_folders_creates_the_artifact_tree() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::at(dir.path());
        ws.ensure_folders().unwrap();

        assert!(dir.path().join("webengine/views").is_dir());
        assert!(dir.path().join("webengine/styles").is_dir());
        assert!(dir.path().join("webengine/scripts").is_dir());
    }

    #[test]
    fn write_artifact_creates_nested_parents() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::at(dir.path());
        let path = ws
            .write_artifact(ResourceKind::Stylesheet, "themes/dark.css", "body {}")
            .unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "body {}");
    }
}
