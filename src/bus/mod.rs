//! Message-bus plumbing: wire messages, topics and the MQTT transport.
//!
//! The transport runs on its own thread and talks to the UI thread only
//! through a [`BusEvent`] channel, the same way plot commands reach the UI
//! through a sink channel. Publishing goes through the [`Publisher`] trait so
//! controls can share one read-only handle.

pub mod messages;
pub mod mqtt;
pub mod topics;

use std::fmt;

pub use messages::{
    CommandMessage, CommandResponse, CommandType, EncodedImage, Frame, Histograms, Payload,
};
pub use mqtt::{connect, BrokerConfig, BusConnection, MqttPublisher};
pub use topics::{topic_matches, Topics};

use crate::error::BusError;

/// Events forwarded from the transport thread to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// A publish delivered on one of the subscribed topics.
    Message { topic: String, payload: Vec<u8> },
    /// The connection state changed.
    Status(ConnectionStatus),
}

/// Connection state shown by the status indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    /// Not yet connected; the last attempt failed and another one is pending.
    Retrying(String),
    Connected,
    Reconnecting,
    /// The transport has stopped; the reason is kept for display.
    Offline(String),
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => f.write_str("Connecting"),
            ConnectionStatus::Retrying(reason) => write!(f, "Connecting (retrying: {reason})"),
            ConnectionStatus::Connected => f.write_str("Connected"),
            ConnectionStatus::Reconnecting => f.write_str("Reconnecting"),
            ConnectionStatus::Offline(reason) => write!(f, "Offline ({reason})"),
        }
    }
}

/// Publish side of the bus, shared by all command controls.
pub trait Publisher {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError>;

    /// Serialize and publish a command message.
    fn publish_command(&self, topic: &str, cmd: &CommandMessage) -> Result<(), BusError> {
        let payload = cmd.to_json()?;
        self.publish(topic, payload)?;
        log::info!("Published {} (value {}) to {}", cmd.cmd_type, cmd.value, topic);
        Ok(())
    }
}
