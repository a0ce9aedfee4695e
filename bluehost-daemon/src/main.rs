/*!
 * BLUEHOST Bluetooth Adapter Control Daemon
 * Adapter and pairing control over a local socket
 * Onyx Digital Intelligence Development LLC
 */

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::UnixListener;
use tracing::info;

use bluehost_daemon::bluetooth::BluetoothManager;
use bluehost_daemon::config::DaemonConfig;
use bluehost_daemon::ipc::IpcServer;

#[derive(Parser)]
#[command(name = "bluehostd")]
#[command(about = "BLUEHOST Bluetooth Adapter Control Daemon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "/etc/bluehost/bluehostd.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon
    Run,
    /// Print the effective configuration
    Config,
    /// Check that the bluetooth tools respond and list adapters
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("bluehost_daemon={},bluehostd={}", log_level, log_level))
        .init();

    let config = DaemonConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config).await,
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Check => check_system(config).await,
    }
}

async fn run_daemon(config: DaemonConfig) -> Result<()> {
    info!("BLUEHOST daemon starting...");

    let bluetooth_manager = BluetoothManager::system(config.bluetooth.clone());

    let socket_path = Path::new(&config.socket_path);
    if let Some(dir) = socket_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating socket directory {}", dir.display()))?;
    }
    if socket_path.exists() {
        // Stale socket from a previous run
        std::fs::remove_file(socket_path)?;
    }

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("binding {}", config.socket_path))?;
    let ipc_server = IpcServer::new(listener, bluetooth_manager);

    info!("BLUEHOST daemon ready on socket: {}", config.socket_path);

    ipc_server.run().await?;

    Ok(())
}

async fn check_system(config: DaemonConfig) -> Result<()> {
    let report = tokio::task::spawn_blocking(move || {
        let manager = BluetoothManager::system(config.bluetooth);
        let versions = manager.versions()?;
        let adapters = manager.list_adapters()?;
        Ok::<_, bluehost_daemon::BluetoothError>((versions, adapters))
    })
    .await??;

    let (versions, adapters) = report;
    println!("{} / BlueZ {}", versions.client_library_version, versions.daemon_version);
    if adapters.is_empty() {
        println!("No adapters found");
    }
    for adapter in adapters.values() {
        let power = adapter
            .power
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{}  {}  power={}  {}",
            adapter.name,
            adapter.address.as_deref().unwrap_or("-"),
            power,
            adapter.device_path
        );
    }
    Ok(())
}
