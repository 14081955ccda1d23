use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User settings for webengine-sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Developer access token for the remote instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Push the file to the instance automatically on save events
    #[serde(default)]
    pub sync_on_save: bool,

    /// Delete the remote resource automatically on delete events
    #[serde(default)]
    pub sync_on_delete: bool,

    /// Override for the remote API origin. `{instance}` is replaced with the
    /// instance identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_origin: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            token: None,
            sync_on_save: false,
            sync_on_delete: false,
            api_origin: None,
        }
    }
}

impl Settings {
    /// Load settings from file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = Self::settings_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content).context("Failed to parse settings file")?;

        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        crate::config::ConfigManager::settings_path()
    }

    /// The token, or an auth error telling the user how to set one.
    pub fn require_token(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(crate::error::SyncError::Auth(
                "Access token not found. Run 'webengine-sync config --token <TOKEN>'.".to_string(),
            )
            .into()),
        }
    }
}

/// Print current settings
pub fn show_settings() -> Result<()> {
    let settings = Settings::load()?;

    println!("{}", "Current settings:".cyan().bold());
    let token_display = match settings.token.as_deref() {
        Some(t) if t.len() > 8 => format!("{}…", &t[..8]),
        Some(_) => "(set)".to_string(),
        None => "(not set)".to_string(),
    };
    println!("  token:          {token_display}");
    println!("  sync_on_save:   {}", settings.sync_on_save);
    println!("  sync_on_delete: {}", settings.sync_on_delete);
    println!(
        "  api_origin:     {}",
        settings.api_origin.as_deref().unwrap_or("(default)")
    );

    Ok(())
}

/// Apply CLI updates to the stored settings
pub fn update_settings(
    token: Option<String>,
    sync_on_save: Option<bool>,
    sync_on_delete: Option<bool>,
    api_origin: Option<String>,
) -> Result<()> {
    let mut settings = Settings::load()?;

    if let Some(token) = token {
        settings.token = Some(token);
        println!("  {} access token", "Updated".green());
    }
    if let Some(value) = sync_on_save {
        settings.sync_on_save = value;
        println!("  {} sync_on_save = {value}", "Updated".green());
    }
    if let Some(value) = sync_on_delete {
        settings.sync_on_delete = value;
        println!("  {} sync_on_delete = {value}", "Updated".green());
    }
    if let Some(origin) = api_origin {
        settings.api_origin = Some(origin);
        println!("  {} api_origin", "Updated".green());
    }

    settings.save()?;
    println!("{}", "Settings saved.".green());

    Ok(())
}
