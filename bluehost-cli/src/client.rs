/*!
 * BLUEHOST Daemon Client
 * JSON IPC communication with bluehostd
 */

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

use bluehost_daemon::ipc::{Request, Response};

pub struct BluehostClient {
    socket_path: String,
}

impl BluehostClient {
    pub fn new(socket_path: String) -> Self {
        Self { socket_path }
    }

    pub async fn send_request(&self, request: &Request) -> Result<Response> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| anyhow!("cannot reach bluehostd at {}: {}", self.socket_path, e))?;
        let (reader, mut writer) = stream.into_split();

        debug!(request = ?request.redacted(), "Sending request to {}", self.socket_path);
        let request_json = serde_json::to_string(request)?;
        writer.write_all(request_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.shutdown().await?;

        let mut response_line = String::new();
        BufReader::new(reader).read_line(&mut response_line).await?;
        if response_line.trim().is_empty() {
            return Err(anyhow!("bluehostd closed the connection without answering"));
        }

        let response: Response = serde_json::from_str(response_line.trim())?;
        debug!("Received {:?}", response);
        Ok(response)
    }
}
