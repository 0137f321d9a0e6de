use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use crate::error::ConnectorError;
use crate::runner::ProcessRunner;

const SYSFS_NET: &str = "/sys/class/net";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WifiInterface {
    pub name: String,
    pub state: String,
    pub is_usb: bool,
}

/// Return the first IPv4 address assigned to `interface`
pub fn current_ip<R: ProcessRunner>(runner: &R, interface: &str) -> Result<Ipv4Addr> {
    let args = ["-4", "-o", "addr", "show", "dev", interface].map(String::from);

    let output = runner
        .run("ip", &args)
        .map_err(|e| lookup_error(interface, e.to_string()))?;

    if !output.success() {
        return Err(lookup_error(interface, output.describe_failure()).into());
    }

    parse_ipv4(&output.stdout)
        .ok_or_else(|| lookup_error(interface, "no IPv4 address assigned".to_string()).into())
}

fn lookup_error(interface: &str, reason: String) -> ConnectorError {
    ConnectorError::InterfaceLookup {
        interface: interface.to_string(),
        reason,
    }
}

/// Pull the address out of `ip -o addr` output ("... inet 10.0.0.5/24 brd ...")
pub fn parse_ipv4(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        tokens.find(|t| *t == "inet")?;
        let cidr = tokens.next()?;
        let addr = cidr.split('/').next()?;
        addr.parse().ok()
    })
}

/// List all WiFi interfaces on the system
pub fn list_wireless_interfaces() -> Result<Vec<WifiInterface>> {
    list_wireless_interfaces_in(Path::new(SYSFS_NET))
}

/// List WiFi interfaces below a sysfs `class/net` directory
pub fn list_wireless_interfaces_in(root: &Path) -> Result<Vec<WifiInterface>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read interface table: {}", root.display()))?;

    let mut interfaces = Vec::new();

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read {}", root.display()))?;
        let path = entry.path();

        if !path.join("wireless").exists() && !path.join("phy80211").exists() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let state = fs::read_to_string(path.join("operstate"))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        interfaces.push(WifiInterface {
            is_usb: is_usb_interface(&path),
            name,
            state,
        });
    }

    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(interfaces)
}

/// Check if a network interface is USB-based by examining sysfs
fn is_usb_interface(iface_dir: &Path) -> bool {
    let device = iface_dir.join("device");

    if !device.exists() {
        return false;
    }

    // Resolve the symlink and check if it contains "usb"
    if let Ok(resolved) = fs::read_link(&device) {
        if resolved.to_string_lossy().contains("usb") {
            return true;
        }
    }

    // Alternative: check uevent file for USB
    if let Ok(content) = fs::read_to_string(device.join("uevent")) {
        if content.contains("usb") {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inet_line() {
        let out = "3: wlan0    inet 192.168.1.23/24 brd 192.168.1.255 scope global dynamic wlan0\\       valid_lft 86112sec preferred_lft 86112sec\n";
        assert_eq!(parse_ipv4(out), Some(Ipv4Addr::new(192, 168, 1, 23)));
    }

    #[test]
    fn no_inet_means_no_address() {
        assert_eq!(parse_ipv4(""), None);
        assert_eq!(parse_ipv4("3: wlan0    inet6 fe80::1/64 scope link\n"), None);
    }

    #[test]
    fn finds_wireless_entries_in_sysfs() {
        let root = tempfile::tempdir().unwrap();

        let wlan0 = root.path().join("wlan0");
        fs::create_dir_all(wlan0.join("wireless")).unwrap();
        fs::write(wlan0.join("operstate"), "up\n").unwrap();

        let wlan1 = root.path().join("wlan1");
        fs::create_dir_all(wlan1.join("phy80211")).unwrap();
        fs::create_dir_all(wlan1.join("device")).unwrap();
        fs::write(wlan1.join("device").join("uevent"), "DRIVER=rtl8xxxu\nPRODUCT=usb\n").unwrap();

        fs::create_dir_all(root.path().join("eth0")).unwrap();

        let found = list_wireless_interfaces_in(root.path()).unwrap();

        assert_eq!(
            found,
            vec![
                WifiInterface {
                    name: "wlan0".into(),
                    state: "up".into(),
                    is_usb: false,
                },
                WifiInterface {
                    name: "wlan1".into(),
                    state: "unknown".into(),
                    is_usb: true,
                },
            ]
        );
    }
}
