/*!
 * IPC Server for BLUEHOST Daemon
 * JSON protocol over Unix socket
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use uuid::Uuid;

use crate::bluetooth::{Adapter, BluetoothManager, PowerMode, Versions};
use crate::error::BluetoothError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    GetVersions,
    ListAdapters,
    /// `mode` is `"on"` or `"off"`; anything else is rejected as `InvalidPowerMode`.
    SetPower { adapter: String, mode: String },
    SetDiscoverable { adapter: String },
    SetNonDiscoverable { adapter: String },
    Discover,
    Block { address: String },
    Unblock { address: String },
    Pair { address: String, passkey: String },
    Unpair { address: String },
    StartService,
    StopService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Versions { versions: Versions },
    Adapters { adapters: BTreeMap<String, Adapter> },
    Flag { value: bool },
    Devices { devices: Vec<BTreeMap<String, String>> },
    Lines { lines: Vec<String> },
    Service { output: String },
    Success { message: String },
    Error { kind: String, message: String },
}

impl Request {
    /// Copy that is safe to log: pairing passkeys are masked.
    pub fn redacted(&self) -> Request {
        match self {
            Request::Pair { address, .. } => Request::Pair {
                address: address.clone(),
                passkey: "***".to_string(),
            },
            other => other.clone(),
        }
    }
}

impl From<BluetoothError> for Response {
    fn from(err: BluetoothError) -> Self {
        Response::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Run one request against the manager. Blocks on child processes.
pub fn dispatch(manager: &BluetoothManager, request: Request) -> Response {
    let result = match request {
        Request::GetVersions => manager
            .versions()
            .map(|versions| Response::Versions { versions }),
        Request::ListAdapters => manager
            .list_adapters()
            .map(|adapters| Response::Adapters { adapters }),
        Request::SetPower { adapter, mode } => mode
            .parse::<PowerMode>()
            .and_then(|mode| manager.set_power(&adapter, mode))
            .map(|value| Response::Flag { value }),
        Request::SetDiscoverable { adapter } => manager
            .set_discoverable(&adapter)
            .map(|value| Response::Flag { value }),
        Request::SetNonDiscoverable { adapter } => manager
            .set_non_discoverable(&adapter)
            .map(|value| Response::Flag { value }),
        Request::Discover => manager
            .discover()
            .map(|devices| Response::Devices { devices }),
        Request::Block { address } => manager.block(&address).map(|()| Response::Success {
            message: format!("Blocked {}", address),
        }),
        Request::Unblock { address } => manager.unblock(&address).map(|()| Response::Success {
            message: format!("Unblocked {}", address),
        }),
        Request::Pair { address, passkey } => manager
            .pair(&address, &passkey)
            .map(|lines| Response::Lines { lines }),
        Request::Unpair { address } => manager
            .unpair(&address)
            .map(|lines| Response::Lines { lines }),
        Request::StartService => manager.start().map(|output| Response::Service { output }),
        Request::StopService => manager.stop().map(|output| Response::Service { output }),
    };

    result.unwrap_or_else(Response::from)
}

pub struct IpcServer {
    listener: UnixListener,
    bluetooth_manager: Arc<BluetoothManager>,
}

impl IpcServer {
    pub fn new(listener: UnixListener, bluetooth_manager: BluetoothManager) -> Self {
        Self {
            listener,
            bluetooth_manager: Arc::new(bluetooth_manager),
        }
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!("IPC server listening for connections...");

        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    tracing::debug!("New client connected");
                    let bluetooth_manager = self.bluetooth_manager.clone();

                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, bluetooth_manager).await {
                            tracing::error!("Client error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

/// Serve one connection: a JSON request per line in, a JSON response per line out.
pub async fn handle_client(
    stream: UnixStream,
    bluetooth_manager: Arc<BluetoothManager>,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        let request_id = Uuid::new_v4();
        let response = match serde_json::from_str::<Request>(request) {
            Ok(request) => {
                tracing::debug!(%request_id, request = ?request.redacted(), "Received request");
                let manager = bluetooth_manager.clone();
                tokio::task::spawn_blocking(move || dispatch(&manager, request)).await?
            }
            Err(e) => {
                tracing::warn!(%request_id, "Malformed request: {}", e);
                Response::Error {
                    kind: "BadRequest".to_string(),
                    message: e.to_string(),
                }
            }
        };

        if let Response::Error { kind, message } = &response {
            tracing::debug!(%request_id, %kind, "Request failed: {}", message);
        }

        let response_json = serde_json::to_string(&response)?;
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}
