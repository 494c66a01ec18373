//! Transport seam for the live sensor feed.
//!
//! The reconnection supervisor drives connections through [`FeedTransport`]
//! so tests can substitute scripted streams; production uses the WebSocket
//! client below. A transport yields raw text payloads; framing and JSON
//! decoding happen downstream.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::warn;

use crate::error::MonitorError;

/// Stream of raw text payloads from one feed connection.
///
/// The stream ends when the server closes the connection; mid-session
/// failures surface as an `Err` item.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, MonitorError>> + Send>>;

/// Connects to the live feed.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Open one connection to `url`.
    async fn connect(&self, url: &str) -> Result<FrameStream, MonitorError>;
}

/// WebSocket transport backed by tokio-tungstenite.
#[derive(Debug, Default)]
pub struct WebSocketTransport;

#[async_trait]
impl FeedTransport for WebSocketTransport {
    async fn connect(&self, url: &str) -> Result<FrameStream, MonitorError> {
        let (socket, _response) = connect_async(url).await?;
        let frames = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => Some(Ok(text)),
                    Err(_) => {
                        warn!("Dropping non-UTF-8 binary frame");
                        None
                    }
                },
                // Ping/pong are answered by the library; close ends the
                // stream on its own.
                Ok(_) => None,
                Err(err) => Some(Err(MonitorError::from(err))),
            }
        });
        Ok(Box::pin(frames))
    }
}
