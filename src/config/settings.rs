use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TfatError};

/// User configuration, loaded from `<home>/config.toml`.
///
/// Every field has a sensible default so tfat works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File name (relative to the tfat home) of the encrypted vault.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Copy each new code to the clipboard while showing it.
    #[serde(default = "default_copy_to_clipboard")]
    pub copy_to_clipboard: bool,

    /// How often the live code display refreshes, in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "tfat.dat".to_string()
}

fn default_copy_to_clipboard() -> bool {
    true
}

fn default_refresh_interval_ms() -> u64 {
    1_000
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            copy_to_clipboard: default_copy_to_clipboard(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the tfat home directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<home>/config.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            TfatError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.vault_file.trim().is_empty() {
            return Err(TfatError::ConfigError(format!(
                "{}: vault_file cannot be empty",
                config_path.display()
            )));
        }

        if !is_plain_file_name(&settings.vault_file) {
            return Err(TfatError::ConfigError(format!(
                "{}: vault_file must be a file name inside the tfat home, got '{}'",
                config_path.display(),
                settings.vault_file
            )));
        }

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `~/.tfat/tfat.dat`
    pub fn vault_path(&self, home: &Path) -> PathBuf {
        home.join(&self.vault_file)
    }

    /// Refresh interval for the live display (never below 100 ms).
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(100))
    }
}

/// `true` if `name` is a single path component (no separators, no `..`).
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// The default tfat home directory: `~/.tfat`.
pub fn default_home() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".tfat"))
        .ok_or_else(|| TfatError::ConfigError("cannot determine home directory".into()))
}

// ── Tests ────────────────────────────────────────────────────────────
