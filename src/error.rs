//! Core error types.
//!
//! Most of these never escape the crate: fetch failures resolve to empty
//! results and transport failures feed the reconnect loop. The typed enum
//! exists so call sites can log a precise cause and so transport
//! implementations outside the built-in WebSocket client can report
//! failures through the same seam.

use thiserror::Error;

/// Errors surfaced by the transport and REST layers.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The live feed failed to connect or dropped mid-session.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A discovery or history request failed (network, status, or decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for MonitorError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
