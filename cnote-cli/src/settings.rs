//! Application settings persistence for cnote.
//!
//! Stores the note folder, editor command and prompt in a JSON file at an
//! OS-appropriate location.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Editor used when neither the settings nor `$EDITOR` name one.
pub const DEFAULT_EDITOR: &str = "vi";

/// Prompt shown when the settings do not set one.
pub const DEFAULT_PROMPT: &str = ">";

/// Keys accepted by `config get` / `config set`.
pub const KEYS: [&str; 3] = ["notePath", "editor", "prompt"];

/// Persisted application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Root folder that holds the notes. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_path: Option<String>,
    /// Command used to open notes, e.g. `"code --wait"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl AppSettings {
    /// The note folder with `~` expanded, if one is configured.
    pub fn note_dir(&self) -> Option<PathBuf> {
        self.note_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(expand_home)
    }

    /// The editor command: settings, then `$EDITOR`, then [`DEFAULT_EDITOR`].
    pub fn editor(&self) -> String {
        non_empty(self.editor.clone())
            .or_else(|| non_empty(env::var("EDITOR").ok()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    pub fn prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROMPT)
    }

    /// Looks up a key as it appears in the settings file.
    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        Ok(match key {
            "notePath" => self.note_path.as_deref(),
            "editor" => self.editor.as_deref(),
            "prompt" => self.prompt.as_deref(),
            _ => bail!("Unknown setting {key:?}, expected one of {}", KEYS.join(", ")),
        })
    }

    /// Changes a key; an empty value clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = non_empty(Some(value.trim().to_string()));
        match key {
            "notePath" => self.note_path = value,
            "editor" => self.editor = value,
            "prompt" => self.prompt = value,
            _ => bail!("Unknown setting {key:?}, expected one of {}", KEYS.join(", ")),
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(path),
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/cnote/settings.json`
/// - Windows: `%APPDATA%/cnote/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("cnote").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("cnote").join("settings.json")
    }
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings(path: &Path) -> AppSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings file {}: {e}", path.display());
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

/// Saves settings to `path`, creating parent directories as needed.
pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create settings directory")?;
    }
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;
    Ok(())
}
