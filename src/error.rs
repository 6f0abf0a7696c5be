//! Error types shared across the dashboard.
//!
//! Nothing here is fatal once the window is running: decode errors drop a
//! single message, bus errors degrade a single control. Only configuration
//! and start-up errors surface from `main`.

use std::path::PathBuf;

use thiserror::Error;

/// A bus payload that could not be turned into the expected message.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unsupported image data: {0}")]
    Image(#[from] image::ImageError),
    #[error("unknown command type {0}")]
    UnknownCommand(i64),
    #[error("empty payload")]
    Empty,
}

/// Failures talking to the message bus.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("unsupported broker url {0:?} (expected mqtt://, tcp:// or ws://)")]
    InvalidUrl(String),
    #[error("websocket transport requested but the `websocket` feature is disabled")]
    WebsocketDisabled,
    #[error("mqtt client error: {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures loading the dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error returned by the binary.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("failed to run the dashboard window: {0}")]
    Window(#[from] eframe::Error),
}
