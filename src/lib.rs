//! WiFi connector library
//!
//! This library configures and manages a WiFi connection on a Linux host by
//! driving a small set of helper scripts (`scan.sh`, `connect.sh`,
//! `disconnect.sh`) together with `wpa_passphrase`. It writes the credentials
//! config file, runs the scripts, checks their exit codes, and probes internet
//! reachability.
//!
//! # Modules
//!
//! - [`config`] - Settings file for the tool itself
//! - [`connection`] - Connection manager (connect, disconnect, credentials)
//! - [`credentials`] - Passphrase validation and network block generation
//! - [`error`] - Custom error types for the library
//! - [`interface`] - IPv4 lookup and wireless interface discovery
//! - [`probe`] - Internet reachability probe
//! - [`prompt`] - Terminal prompts, including hidden secret entry
//! - [`runner`] - External process execution
//! - [`scan`] - WiFi network scanning
//!
//! # Example Usage
//!
//! ```no_run
//! use wifi_connector::{ConnectionManager, is_online};
//!
//! let mut manager = ConnectionManager::new("wpa.conf", "status.txt", false)?;
//! for ssid in manager.available_networks() {
//!     println!("{}", ssid);
//! }
//!
//! manager.set_wifi_credentials("HomeNetwork", "password123")?;
//! manager.connect_wifi()?;
//! println!("online: {}", is_online());
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Settings module for the connector's own TOML configuration.
pub mod config;

/// Connection module holding the connection manager and its state.
pub mod connection;

/// Credentials module: key validation and `wpa_passphrase` invocation.
pub mod credentials;

/// Error module defining custom error types for the library.
/// Uses `thiserror` for ergonomic error handling.
pub mod error;

/// Interface module for IPv4 lookup and WiFi adapter discovery.
pub mod interface;

/// Probe module checking internet reachability over TCP.
pub mod probe;

/// Prompt module for interactive terminal input.
pub mod prompt;

/// Runner module abstracting external process execution.
pub mod runner;

/// Scan module for discovering available WiFi networks.
pub mod scan;

// Re-export the manager and its state for convenient access
pub use connection::{ConnectionManager, ConnectionState};

// Re-export the main error type for library users
pub use error::ConnectorError;

pub use interface::{WifiInterface, current_ip, list_wireless_interfaces};

pub use probe::{Probe, is_online};

pub use runner::{ProcessOutput, ProcessRunner, ScriptSet, SystemRunner};

pub use scan::available_networks;
