//! WiFi network scanning module.
//!
//! This module discovers nearby WiFi networks by running the `scan.sh` helper
//! script and scraping network names out of its output. The script is expected
//! to print `iwlist`-style lines, some of which carry an `ESSID:"<name>"` field.
//!
//! # Scanning Process
//!
//! 1. Runs `scan.sh` (through `sudo -E` unless elevation is disabled)
//! 2. Joins the captured stdout and stderr
//! 3. Matches every line against `ESSID:"<name>"`
//! 4. Drops duplicates, keeping the order of first appearance
//!
//! A failing scan never produces an error: the caller gets an empty list and
//! the cause is logged.
//!
//! # Example
//!
//! ```no_run
//! use wifi_connector::runner::{ScriptSet, SystemRunner};
//! use wifi_connector::scan::{available_networks, display_networks};
//!
//! let networks = available_networks(&SystemRunner, &ScriptSet::default());
//! display_networks(&networks);
//! ```

use std::collections::HashSet;

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ConnectorError;
use crate::runner::{ProcessRunner, SCAN_SCRIPT, ScriptSet};

lazy_static! {
    static ref ESSID: Regex = Regex::new(r#"ESSID:"(?P<name>.+)""#).unwrap();
}

/// Scans for WiFi networks and returns their names.
///
/// This is the boundary where scan failures are converted into an empty
/// result. The underlying error is logged at `warn` level.
///
/// # Arguments
/// * `runner` - Process runner used to execute the scan script
/// * `scripts` - Location of the helper scripts and elevation setting
///
/// # Returns
/// Network names in the order the scan reported them, without duplicates.
pub fn available_networks<R: ProcessRunner>(runner: &R, scripts: &ScriptSet) -> Vec<String> {
    match try_scan(runner, scripts) {
        Ok(networks) => {
            debug!(count = networks.len(), "scan finished");
            networks
        }
        Err(e) => {
            warn!("network scan failed: {:#}", e);
            Vec::new()
        }
    }
}

/// Runs the scan script, failing on spawn errors and nonzero exits.
fn try_scan<R: ProcessRunner>(runner: &R, scripts: &ScriptSet) -> Result<Vec<String>> {
    let output = scripts
        .run(runner, SCAN_SCRIPT, &[])
        .map_err(|e| ConnectorError::ScriptExecution {
            script: SCAN_SCRIPT.to_string(),
            detail: e.to_string(),
        })?;

    if !output.success() {
        return Err(ConnectorError::ScriptExecution {
            script: SCAN_SCRIPT.to_string(),
            detail: output.describe_failure(),
        }
        .into());
    }

    let combined = format!("{}\n{}", output.stdout, output.stderr);
    Ok(parse_essids(&combined))
}

/// Extracts network names from scan output.
///
/// Lines without an `ESSID:"..."` field are skipped, as are names already
/// seen earlier in the output.
///
/// # Example
/// ```
/// use wifi_connector::scan::parse_essids;
///
/// let out = "one: ESSID:\"Home\"\ntwo: ESSID:\"Office\"\ngarbage\n";
/// assert_eq!(parse_essids(out), vec!["Home", "Office"]);
/// ```
pub fn parse_essids(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for line in output.lines() {
        let Some(caps) = ESSID.captures(line) else {
            continue;
        };
        let name = caps["name"].to_string();
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
}

/// Displays a list of network names, one per row.
///
/// # Output Format
/// ```text
/// #   SSID
/// ----------------------------------------
/// 1   MyHomeNetwork
/// 2   GuestNetwork
/// ```
///
/// Long SSIDs are truncated to fit within the column width with "..." appended.
pub fn display_networks(networks: &[String]) {
    if networks.is_empty() {
        println!("No networks found.");
        return;
    }

    println!("{:<3} {}", "#", "SSID");
    println!("{}", "-".repeat(40));

    for (index, ssid) in networks.iter().enumerate() {
        println!("{:<3} {}", index + 1, truncate_ssid(ssid, 32));
    }
}

/// Truncates an SSID to at most `max_len` characters, appending "..." when cut.
fn truncate_ssid(ssid: &str, max_len: usize) -> String {
    if ssid.chars().count() > max_len {
        let kept: String = ssid.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        ssid.to_string()
    }
}
