use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConnectorError;
use crate::probe::Probe;
use crate::runner::ScriptSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding scan.sh, connect.sh and disconnect.sh
    pub scripts_dir: PathBuf,
    /// Run the scripts through `sudo -E`
    pub elevate: bool,
    pub passphrase_tool: String,
    pub interface: String,
    /// Credentials config written for wpa_supplicant
    pub wpa_config: PathBuf,
    pub status_file: PathBuf,
    pub probe: Probe,
}

impl Default for Settings {
    fn default() -> Self {
        let scripts = ScriptSet::default();
        Settings {
            scripts_dir: scripts.dir,
            elevate: scripts.elevate,
            passphrase_tool: scripts.passphrase_tool,
            interface: "wlan0".to_string(),
            wpa_config: PathBuf::from("wpa.conf"),
            status_file: PathBuf::from("wpa-status.txt"),
            probe: Probe::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe.timeout_ms == 0 {
            return Err(ConnectorError::Validation(
                "probe.timeout_ms must be greater than 0".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn scripts(&self) -> ScriptSet {
        ScriptSet {
            dir: self.scripts_dir.clone(),
            elevate: self.elevate,
            passphrase_tool: self.passphrase_tool.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("wifi-connector").join("config.toml"))
}
