use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("WPA config file not found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("An error occurred when running {script}: {detail}")]
    ScriptExecution { script: String, detail: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not generate network configuration: {0}")]
    CredentialGeneration(String),

    #[error("No IPv4 address for interface '{interface}': {reason}")]
    InterfaceLookup { interface: String, reason: String },
}
