//! Internet reachability probe.
//!
//! Resolves a well-known host and opens a TCP connection to it. Any failure
//! along the way counts as "offline"; the reason is only logged.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const REMOTE_SERVER: &str = "www.google.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl Default for Probe {
    fn default() -> Self {
        Probe {
            host: REMOTE_SERVER.to_string(),
            port: 80,
            timeout_ms: 2000,
        }
    }
}

impl Probe {
    /// Returns `true` if a TCP connection to the probe target succeeds.
    pub fn is_online(&self) -> bool {
        match self.check() {
            Ok(addr) => {
                debug!(%addr, "reachability probe succeeded");
                true
            }
            Err(e) => {
                debug!(host = %self.host, port = self.port, "reachability probe failed: {}", e);
                false
            }
        }
    }

    /// Resolves the target and connects once, returning the address reached.
    pub fn check(&self) -> io::Result<SocketAddr> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port).to_socket_addrs()?.collect();

        // Prefer IPv4.
        let addr = addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no addresses for {}", self.host))
            })?;

        TcpStream::connect_timeout(&addr, Duration::from_millis(self.timeout_ms))?;
        Ok(addr)
    }
}

/// Probes the default remote server.
pub fn is_online() -> bool {
    Probe::default().is_online()
}
