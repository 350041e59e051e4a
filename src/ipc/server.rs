//! Line-delimited JSON IPC server.
//!
//! Each request is one UTF-8 JSON object followed by `\n`; each response is
//! one JSON envelope followed by `\n`. A connection handles one request at a
//! time and closes on EOF or on an empty line.
//!
//! # Thread Safety
//!
//! Each connection is handled in its own spawned task. The dispatcher is
//! shared via `Arc` and the store it wraps synchronizes internally.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use crate::dispatch::RequestDispatcher;
use crate::models::{ApiResponse, CacheRequest};

const INVALID_REQUEST_FORMAT: &str = "Invalid request format";

/// IPC server bound to a TCP address, not yet accepting.
pub struct IpcServer {
    listener: TcpListener,
    dispatcher: Arc<RequestDispatcher>,
}

impl IpcServer {
    /// Binds the listener. Use port 0 for an OS-assigned port.
    pub async fn bind(addr: SocketAddr, dispatcher: Arc<RequestDispatcher>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    /// Get the address the server is listening on.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop on a background task.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Accepts connections until `cancel` fires, then waits for open
    /// connections to wind down.
    pub async fn run(self, cancel: CancellationToken) {
        if let Ok(addr) = self.local_addr() {
            info!("IPC server listening on {}", addr);
        }
        let connections = TaskTracker::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("IPC server shutting down");
                    break;
                }
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let cancel = cancel.clone();
                            connections.spawn(async move {
                                debug!("IPC connection from {}", peer_addr);
                                if let Err(e) = handle_connection(stream, &dispatcher, &cancel).await {
                                    debug!("IPC connection {} ended: {}", peer_addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("IPC accept error: {}", e);
                        }
                    }
                }
            }
        }

        connections.close();
        connections.wait().await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    dispatcher: &RequestDispatcher,
    cancel: &CancellationToken,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            read = reader.read_until(b'\n', &mut buf) => read?,
        };

        // EOF or an empty line ends the session.
        if read == 0 || buf.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let response = process_line(&buf, dispatcher);
        let mut payload = serde_json::to_vec(&response)?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
        writer.flush().await?;
    }
}

/// Decodes one request line and dispatches it.
///
/// Lines that are not valid UTF-8 JSON get a failure envelope like any other
/// malformed request.
fn process_line(line: &[u8], dispatcher: &RequestDispatcher) -> ApiResponse<Value> {
    match serde_json::from_slice::<CacheRequest>(line) {
        Ok(request) => dispatcher.handle(request),
        Err(e) => {
            debug!("Rejecting malformed IPC request: {}", e);
            ApiResponse::failure(INVALID_REQUEST_FORMAT)
        }
    }
}
