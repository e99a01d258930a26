use futures::{SinkExt, StreamExt};
use natter_chat::{OutboundMessage, Transport, TransportError};
use snafu::ResultExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::error::{AppResult, ConnectSnafu};

/// Queues frames for the socket writer task; never blocks the caller.
#[derive(Debug, Clone)]
pub struct SocketTransport {
    outbound: mpsc::UnboundedSender<String>,
}

impl SocketTransport {
    pub fn new(outbound: mpsc::UnboundedSender<String>) -> Self {
        Self { outbound }
    }
}

impl Transport for SocketTransport {
    fn send(&self, frame: &str) -> Result<(), TransportError> {
        self.outbound
            .send(frame.to_string())
            .map_err(|_| TransportError::Closed {
                stage: "socket-queue-frame",
            })
    }
}

/// Background halves of one websocket connection.
pub struct SocketTasks {
    pub writer: JoinHandle<()>,
    pub reader: JoinHandle<()>,
}

pub async fn connect(url: &str) -> AppResult<(SocketTransport, SocketTasks)> {
    let (stream, _) = connect_async(url)
        .await
        .map_err(Box::new)
        .context(ConnectSnafu {
            stage: "socket-connect",
            url: url.to_string(),
        })?;
    tracing::info!(%url, "connected to chat server");

    let (mut write, mut read) = stream.split();
    let (outbound, mut frames) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if let Err(error) = write.send(WsMessage::Text(frame)).await {
                tracing::warn!("failed to write socket frame: {}", error);
                break;
            }
        }
        let _ = write.close().await;
    });

    // Inbound chat is rendered elsewhere; here frames are only traced.
    let reader = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(WsMessage::Text(text)) => match OutboundMessage::from_json(&text) {
                    Ok(message) => tracing::debug!(
                        author = %message.author,
                        kind = ?message.kind,
                        "inbound frame"
                    ),
                    Err(error) => tracing::debug!("unrecognized inbound frame: {}", error),
                },
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!("socket read failed: {}", error);
                    break;
                }
            }
        }
        tracing::info!("chat server connection closed");
    });

    Ok((SocketTransport::new(outbound), SocketTasks { writer, reader }))
}
