//! WiFi connection management module.
//!
//! [`ConnectionManager`] owns a credentials config file (WPA config format) and
//! a status file, and drives the helper scripts that bring the wifi interface
//! up and down. All network work happens in those scripts; the manager only
//! sequences the calls, maintains the two files, and translates exit codes
//! into [`ConnectorError`]s.
//!
//! # Requirements
//!
//! - `scan.sh`, `connect.sh` and `disconnect.sh` in the scripts directory
//! - `wpa_passphrase` available in PATH
//! - `sudo` rights for the scripts, unless elevation is disabled
//!
//! # Example
//!
//! ```no_run
//! use wifi_connector::connection::ConnectionManager;
//!
//! let mut manager = ConnectionManager::new("wpa.conf", "status.txt", false)?;
//! manager.set_wifi_credentials("MyNetwork", "password123")?;
//! manager.connect_wifi()?;
//! manager.disconnect_wifi(false)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::credentials;
use crate::error::ConnectorError;
use crate::interface;
use crate::runner::{CONNECT_SCRIPT, DISCONNECT_SCRIPT, ProcessRunner, ScriptSet, SystemRunner};
use crate::scan;

/// Connection state tracked by a [`ConnectionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionState {
    /// No credentials stored and not connected.
    Disconnected,
    /// Credentials are stored in the config file but no connection is up.
    ConfigPending,
    /// The connect script succeeded.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::ConfigPending => "config pending",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Sequences the wifi helper scripts around a credentials config file.
#[derive(Debug)]
pub struct ConnectionManager<R: ProcessRunner = SystemRunner> {
    config_file: PathBuf,
    status_file: PathBuf,
    scripts: ScriptSet,
    runner: R,
    state: ConnectionState,
}

impl ConnectionManager<SystemRunner> {
    /// Initializes a manager with the default scripts and the system runner.
    pub fn new(
        config_file: impl Into<PathBuf>,
        status_file: impl Into<PathBuf>,
        autoconnect: bool,
    ) -> Result<Self> {
        Self::initialize(
            config_file,
            status_file,
            autoconnect,
            ScriptSet::default(),
            SystemRunner,
        )
    }
}

impl<R: ProcessRunner> ConnectionManager<R> {
    /// Creates a manager and brings the interface into a known state.
    ///
    /// The status file is created if missing. With `autoconnect` and an
    /// existing config file a connection is attempted, falling back to a
    /// disconnect if that fails. Otherwise the interface is disconnected and
    /// an empty config file is created if none exists.
    ///
    /// # Errors
    /// Returns an error if a file cannot be created or if the disconnect
    /// script fails.
    pub fn initialize(
        config_file: impl Into<PathBuf>,
        status_file: impl Into<PathBuf>,
        autoconnect: bool,
        scripts: ScriptSet,
        runner: R,
    ) -> Result<Self> {
        let mut manager = ConnectionManager {
            config_file: config_file.into(),
            status_file: status_file.into(),
            scripts,
            runner,
            state: ConnectionState::Disconnected,
        };

        touch(&manager.status_file)?;

        if autoconnect && manager.config_file.exists() {
            if let Err(e) = manager.connect_wifi() {
                warn!("automatic connection failed, disconnecting: {:#}", e);
                manager.disconnect_wifi(false)?;
            }
        } else {
            manager.disconnect_wifi(false)?;
            touch(&manager.config_file)?;
        }

        Ok(manager)
    }

    /// Wraps existing files without running any script or touching the disk.
    ///
    /// The link is not probed, so the state starts as `ConfigPending` when the
    /// config file holds credentials and `Disconnected` otherwise.
    pub fn open(
        config_file: impl Into<PathBuf>,
        status_file: impl Into<PathBuf>,
        scripts: ScriptSet,
        runner: R,
    ) -> Self {
        let mut manager = ConnectionManager {
            config_file: config_file.into(),
            status_file: status_file.into(),
            scripts,
            runner,
            state: ConnectionState::Disconnected,
        };
        if manager.has_stored_credentials() {
            manager.state = ConnectionState::ConfigPending;
        }
        manager
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn status_file(&self) -> &Path {
        &self.status_file
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Scans for nearby networks. Never fails; see [`scan::available_networks`].
    pub fn available_networks(&self) -> Vec<String> {
        scan::available_networks(&self.runner, &self.scripts)
    }

    /// Returns the IPv4 address of `interface`.
    pub fn current_ip(&self, interface: &str) -> Result<Ipv4Addr> {
        interface::current_ip(&self.runner, interface)
    }

    /// Connects using the credentials in the config file.
    ///
    /// # Errors
    /// - [`ConnectorError::ConfigNotFound`] if the config file does not exist;
    ///   no script is run in that case
    /// - [`ConnectorError::ScriptExecution`] if `connect.sh` fails
    pub fn connect_wifi(&mut self) -> Result<()> {
        if !self.config_file.exists() {
            return Err(ConnectorError::ConfigNotFound(self.config_file.clone()).into());
        }

        info!(
            "Trying to connect with credentials from file {}",
            self.config_file.display()
        );

        let args = [path_arg(&self.config_file), path_arg(&self.status_file)];
        self.run_script(CONNECT_SCRIPT, &args)?;

        self.state = ConnectionState::Connected;
        info!(state = %self.state, "connection established");
        Ok(())
    }

    /// Disconnects, optionally deleting the saved credentials.
    ///
    /// The config file is only removed after `disconnect.sh` succeeded.
    pub fn disconnect_wifi(&mut self, remove_saved_credentials: bool) -> Result<()> {
        self.run_script(DISCONNECT_SCRIPT, &[])?;

        if remove_saved_credentials && self.config_file.exists() {
            fs::remove_file(&self.config_file).with_context(|| {
                format!("Failed to remove config file: {}", self.config_file.display())
            })?;
        }

        self.state = if self.has_stored_credentials() {
            ConnectionState::ConfigPending
        } else {
            ConnectionState::Disconnected
        };
        info!(state = %self.state, "disconnected");
        Ok(())
    }

    /// Stores credentials for `ssid` in the config file.
    ///
    /// # Errors
    /// - [`ConnectorError::Validation`] if `key` is not 8 to 63 characters;
    ///   nothing is written in that case
    /// - [`ConnectorError::CredentialGeneration`] if the passphrase tool does
    ///   not produce a configuration block
    pub fn set_wifi_credentials(&mut self, ssid: &str, key: &str) -> Result<()> {
        info!("Saving credentials for network: {}", ssid);
        let block = credentials::generate_network_block(
            &self.runner,
            &self.scripts.passphrase_tool,
            ssid,
            key,
        )?;

        fs::write(&self.config_file, block).with_context(|| {
            format!("Failed to write config file: {}", self.config_file.display())
        })?;

        self.state = ConnectionState::ConfigPending;
        Ok(())
    }

    /// Removes the config and status files, if present.
    pub fn cleanup(&mut self) -> Result<()> {
        for path in [&self.config_file, &self.status_file] {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        if self.state == ConnectionState::ConfigPending {
            self.state = ConnectionState::Disconnected;
        }
        Ok(())
    }

    fn has_stored_credentials(&self) -> bool {
        fs::metadata(&self.config_file)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    fn run_script(&self, script: &str, args: &[String]) -> Result<()> {
        let output = self
            .scripts
            .run(&self.runner, script, args)
            .map_err(|e| ConnectorError::ScriptExecution {
                script: script.to_string(),
                detail: e.to_string(),
            })?;

        if !output.success() {
            return Err(ConnectorError::ScriptExecution {
                script: script.to_string(),
                detail: output.describe_failure(),
            }
            .into());
        }

        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Create `path` if missing, leaving existing content alone.
fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    Ok(())
}

/// Network status summary for display.
#[derive(Debug, Serialize)]
pub struct NetworkStatus {
    pub interface: String,
    pub online: bool,
    pub ip_address: Option<Ipv4Addr>,
}

/// Displays network status information in a human-readable format.
///
/// # Output Format
/// ```text
/// Interface: wlan0
/// Online:    yes
/// IP:        192.168.4.2
/// ```
pub fn display_status(status: &NetworkStatus) {
    println!("Interface: {}", status.interface);
    println!("Online:    {}", if status.online { "yes" } else { "no" });

    match status.ip_address {
        Some(ip) => println!("IP:        {}", ip),
        None => println!("IP:        (none)"),
    }
}
