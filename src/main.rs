use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use wifi_connector::{
    config::{self, Settings},
    connection::{self, ConnectionManager, ConnectionState, NetworkStatus},
    interface, prompt, scan, ConnectorError, SystemRunner,
};

#[derive(Parser)]
#[command(name = "wifi-connector")]
#[command(about = "Configure and manage a WiFi connection through wpa_supplicant helper scripts")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ~/.config/wifi-connector/config.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct FileArgs {
    /// Credentials config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connection status file
    #[arg(long)]
    status: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, pick a network, connect, and disconnect on ENTER
    Interactive {
        #[command(flatten)]
        files: FileArgs,
    },

    /// Scan for WiFi networks
    Scan {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Connect to a WiFi network
    Connect {
        /// Store new credentials for this SSID first (prompts for the key)
        #[arg(short, long)]
        ssid: Option<String>,

        #[command(flatten)]
        files: FileArgs,
    },

    /// Disconnect from the current network
    Disconnect {
        /// Delete the saved credentials after disconnecting
        #[arg(long)]
        forget: bool,

        #[command(flatten)]
        files: FileArgs,
    },

    /// Show reachability and IPv4 address
    Status {
        /// Interface to check (defaults to the configured interface)
        #[arg(short, long)]
        interface: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exit with status 0 when the internet is reachable, 1 otherwise
    Online,

    /// Print the IPv4 address of an interface
    Ip {
        /// Interface to query (defaults to the configured interface)
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// List available WiFi interfaces
    ListInterfaces,

    /// Show the settings in effect
    ShowConfig,

    /// Write a settings file with default values
    InitConfig {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (settings, settings_path) = match cli.settings {
        Some(path) => (Settings::load_from(&path)?, path),
        None => (Settings::load()?, config::config_path()?),
    };

    match cli.command {
        Commands::Interactive { files } => cmd_interactive(&settings, &files),
        Commands::Scan { json } => cmd_scan(&settings, json),
        Commands::Connect { ssid, files } => cmd_connect(&settings, ssid.as_deref(), &files),
        Commands::Disconnect { forget, files } => cmd_disconnect(&settings, forget, &files),
        Commands::Status { interface, json } => cmd_status(&settings, interface.as_deref(), json),
        Commands::Online => cmd_online(&settings),
        Commands::Ip { interface } => cmd_ip(&settings, interface.as_deref()),
        Commands::ListInterfaces => cmd_list_interfaces(),
        Commands::ShowConfig => cmd_show_config(&settings, &settings_path),
        Commands::InitConfig { force } => cmd_init_config(&settings_path, force),
    }
}

fn manager(settings: &Settings, files: &FileArgs, autoconnect: bool) -> Result<ConnectionManager> {
    let config_file = files.config.clone().unwrap_or_else(|| settings.wpa_config.clone());
    let status_file = files.status.clone().unwrap_or_else(|| settings.status_file.clone());

    ConnectionManager::initialize(
        config_file,
        status_file,
        autoconnect,
        settings.scripts(),
        SystemRunner,
    )
}

fn cmd_interactive(settings: &Settings, files: &FileArgs) -> Result<()> {
    let mut wc = manager(settings, files, false)?;

    let networks = wc.available_networks();
    println!("Available wi-fi access points:");
    scan::display_networks(&networks);
    println!();

    let ssid = prompt::read_line("Provide network's ssid: ")?;
    let key = prompt::read_secret("Password: ")?;

    wc.set_wifi_credentials(&ssid, key.expose_secret())?;
    wc.connect_wifi()?;

    prompt::wait_for_enter("You're connected with wifi. Press [ENTER] to disconnect.")?;
    wc.disconnect_wifi(false)?;
    wc.cleanup()?;

    Ok(())
}

fn cmd_scan(settings: &Settings, json: bool) -> Result<()> {
    let networks = scan::available_networks(&SystemRunner, &settings.scripts());

    if json {
        println!("{}", serde_json::to_string_pretty(&networks)?);
    } else {
        scan::display_networks(&networks);
    }

    Ok(())
}

fn cmd_connect(settings: &Settings, ssid: Option<&str>, files: &FileArgs) -> Result<()> {
    let wc = match ssid {
        Some(ssid) => {
            let mut wc = manager(settings, files, false)?;
            let key = prompt::read_secret(&format!("Password for '{}': ", ssid))?;
            wc.set_wifi_credentials(ssid, key.expose_secret())?;
            wc.connect_wifi()?;
            wc
        }
        None => {
            let config_file = files.config.as_ref().unwrap_or(&settings.wpa_config);
            if !config_file.exists() {
                return Err(ConnectorError::ConfigNotFound(config_file.clone()).into());
            }

            let wc = manager(settings, files, true)?;
            // initialize already fell back to a disconnect and logged the cause
            if wc.state() != ConnectionState::Connected {
                bail!(
                    "Could not connect with credentials from {} (run with RUST_LOG=debug for details)",
                    config_file.display()
                );
            }
            wc
        }
    };

    println!("Connected successfully! ({})", wc.state());
    println!();
    connection::display_status(&network_status(settings, None));

    Ok(())
}

fn cmd_disconnect(settings: &Settings, forget: bool, files: &FileArgs) -> Result<()> {
    let config_file = files.config.clone().unwrap_or_else(|| settings.wpa_config.clone());
    let status_file = files.status.clone().unwrap_or_else(|| settings.status_file.clone());

    let mut wc = ConnectionManager::open(config_file, status_file, settings.scripts(), SystemRunner);
    wc.disconnect_wifi(forget)?;

    if forget {
        println!("Disconnected, credentials removed.");
    } else {
        println!("Disconnected.");
    }

    Ok(())
}

fn network_status(settings: &Settings, interface: Option<&str>) -> NetworkStatus {
    let iface = interface.unwrap_or(&settings.interface).to_string();
    NetworkStatus {
        online: settings.probe.is_online(),
        ip_address: interface::current_ip(&SystemRunner, &iface).ok(),
        interface: iface,
    }
}

fn cmd_status(settings: &Settings, interface: Option<&str>, json: bool) -> Result<()> {
    let status = network_status(settings, interface);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        connection::display_status(&status);
    }

    Ok(())
}

fn cmd_online(settings: &Settings) -> Result<()> {
    if settings.probe.is_online() {
        println!("online");
        Ok(())
    } else {
        println!("offline");
        std::process::exit(1);
    }
}

fn cmd_ip(settings: &Settings, interface: Option<&str>) -> Result<()> {
    let iface = interface.unwrap_or(&settings.interface);
    let ip = interface::current_ip(&SystemRunner, iface)?;
    println!("{}", ip);

    Ok(())
}

fn cmd_list_interfaces() -> Result<()> {
    let interfaces = interface::list_wireless_interfaces()?;

    if interfaces.is_empty() {
        println!("No WiFi interfaces found.");
        return Ok(());
    }

    println!("{:<16} {:<12} {}", "INTERFACE", "STATE", "TYPE");
    println!("{}", "-".repeat(40));

    for iface in interfaces {
        let iface_type = if iface.is_usb { "USB" } else { "Built-in" };
        println!("{:<16} {:<12} {}", iface.name, iface.state, iface_type);
    }

    Ok(())
}

fn cmd_show_config(settings: &Settings, path: &Path) -> Result<()> {
    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("(not present, showing defaults)");
    }
    println!();

    let content = toml::to_string_pretty(settings).context("Failed to serialize config")?;
    print!("{}", content);

    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Settings::default().save_to(path)?;
    println!("Wrote default settings to {}", path.display());

    Ok(())
}
