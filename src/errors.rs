use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures outside the detection core: config, feed transport, wire format.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing setting; the message names the key.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Installing the shutdown signal handlers failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
