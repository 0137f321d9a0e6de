//! Network credential generation.
//!
//! Passphrases are turned into a `network={...}` block by an external tool
//! (normally `wpa_passphrase`), whose output is written verbatim to the
//! credentials config file.

use anyhow::Result;
use tracing::debug;

use crate::error::ConnectorError;
use crate::runner::ProcessRunner;

/// Shortest passphrase accepted for WPA-PSK.
pub const MIN_KEY_LEN: usize = 8;
/// Longest passphrase accepted for WPA-PSK.
pub const MAX_KEY_LEN: usize = 63;

/// Checks that a passphrase has between 8 and 63 characters.
pub fn validate_key(key: &str) -> Result<()> {
    let len = key.chars().count();
    if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&len) {
        return Err(ConnectorError::Validation(format!(
            "Key length must be from {} to {}, got {}",
            MIN_KEY_LEN, MAX_KEY_LEN, len
        ))
        .into());
    }
    Ok(())
}

/// Runs the passphrase tool and returns the generated network block.
///
/// The output must span more than one line; anything else means the tool
/// rejected the credentials.
pub fn generate_network_block<R: ProcessRunner>(
    runner: &R,
    tool: &str,
    ssid: &str,
    key: &str,
) -> Result<String> {
    validate_key(key)?;

    debug!(tool, ssid, "generating network block");
    let output = runner
        .run(tool, &[ssid.to_string(), key.to_string()])
        .map_err(|e| ConnectorError::ScriptExecution {
            script: tool.to_string(),
            detail: e.to_string(),
        })?;

    if !output.success() {
        return Err(ConnectorError::CredentialGeneration(format!(
            "{} {}; check entered network credentials",
            tool,
            output.describe_failure()
        ))
        .into());
    }

    if !output.stdout.contains('\n') {
        return Err(ConnectorError::CredentialGeneration(format!(
            "{} couldn't generate proper configuration, check entered network credentials",
            tool
        ))
        .into());
    }

    Ok(output.stdout)
}
