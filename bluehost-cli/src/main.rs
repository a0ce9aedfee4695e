/*!
 * BLUEHOST Bluetooth Adapter Control CLI
 * One subcommand per daemon operation, JSON out
 * Onyx Digital Intelligence Development LLC
 */

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use bluehost_daemon::bluetooth::{BluetoothManager, PowerMode};
use bluehost_daemon::config::DaemonConfig;
use bluehost_daemon::ipc::{dispatch, Request, Response};

mod client;

use client::BluehostClient;

#[derive(Parser)]
#[command(name = "bluehost")]
#[command(about = "BLUEHOST Bluetooth Adapter Control CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Daemon socket path
    #[arg(short, long, default_value = "/run/bluehost/bluehost.sock")]
    socket: String,

    /// Run the operation in this process instead of asking the daemon
    #[arg(short, long)]
    local: bool,

    /// Configuration file used with --local
    #[arg(short, long, default_value = "/etc/bluehost/bluehostd.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show BlueZ and client library versions
    Version,
    /// List local adapters
    Adapters,
    /// Power an adapter on or off
    Power { adapter: String, mode: PowerMode },
    /// Make an adapter discoverable
    Discoverable { adapter: String },
    /// Turn off inquiry and page scanning on an adapter
    Noscan { adapter: String },
    /// Scan for nearby devices
    Scan,
    /// Block a remote device
    Block { address: String },
    /// Unblock a remote device
    Unblock { address: String },
    /// Pair with a remote device using a numeric passkey
    Pair { address: String, passkey: String },
    /// Remove a paired device
    Unpair { address: String },
    /// Start the bluetooth service
    Start,
    /// Stop the bluetooth service
    Stop,
}

impl From<Commands> for Request {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Version => Request::GetVersions,
            Commands::Adapters => Request::ListAdapters,
            Commands::Power { adapter, mode } => Request::SetPower {
                adapter,
                mode: mode.to_string(),
            },
            Commands::Discoverable { adapter } => Request::SetDiscoverable { adapter },
            Commands::Noscan { adapter } => Request::SetNonDiscoverable { adapter },
            Commands::Scan => Request::Discover,
            Commands::Block { address } => Request::Block { address },
            Commands::Unblock { address } => Request::Unblock { address },
            Commands::Pair { address, passkey } => Request::Pair { address, passkey },
            Commands::Unpair { address } => Request::Unpair { address },
            Commands::Start => Request::StartService,
            Commands::Stop => Request::StopService,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("bluehost_daemon={},bluehost={}", log_level, log_level))
        .with_writer(std::io::stderr)
        .init();

    let request = Request::from(cli.command);

    let response = if cli.local {
        let config = DaemonConfig::read(&cli.config)?;
        tokio::task::spawn_blocking(move || {
            let manager = BluetoothManager::system(config.bluetooth);
            dispatch(&manager, request)
        })
        .await?
    } else {
        BluehostClient::new(cli.socket).send_request(&request).await?
    };

    match response {
        Response::Error { kind, message } => bail!("{}: {}", kind, message),
        response => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
