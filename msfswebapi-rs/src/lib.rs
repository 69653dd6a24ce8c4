//! Blocking client for the MSFS web API: `POST /api/{path}` commands and the
//! `simvar/register` push channel.

mod connection;
mod types;

pub use connection::{Incoming, Registration, WebApiConnection, REGISTER_PATH, SET_MULTIPLE_PATH};
pub use types::{decode_frame, Frame, Reading, ReadingKey, SimVarRequest, SimVarValue};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("url has no host: {0}")]
    MissingHost(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request to {url} failed: status={status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("websocket handshake interrupted")]
    HandshakeInterrupted,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
