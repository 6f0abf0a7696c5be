//! MQTT transport built on `rumqttc`.
//!
//! [`connect`] only builds the client; no network I/O happens until
//! [`BusConnection::spawn`] starts the event-loop thread. Reconnection is
//! handled by `rumqttc` itself: polling the connection again after an error
//! re-establishes it.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};

use super::{BusEvent, ConnectionStatus, Publisher};
use crate::error::BusError;

/// Delay between polls after a connection error.
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// `mqtt://host:port`, `tcp://host:port`, `ws://host:port/path` or bare `host:port`.
    pub url: String,
    /// Client id; a unique one is generated when empty.
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// Capacity of the request channel between client handles and the event loop.
    pub capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:9001".to_string(),
            client_id: String::new(),
            keep_alive_secs: 30,
            capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrokerAddr {
    Tcp { host: String, port: u16 },
    Ws { url: String, port: u16 },
}

pub(crate) fn parse_broker_url(url: &str) -> Result<BrokerAddr, BusError> {
    let invalid = || BusError::InvalidUrl(url.to_string());
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("mqtt", url),
    };
    let authority = rest.split('/').next().unwrap_or_default();
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(port.parse::<u16>().map_err(|_| invalid())?)),
        None => (authority, None),
    };
    if host.is_empty() {
        return Err(invalid());
    }
    match scheme {
        "mqtt" | "tcp" => Ok(BrokerAddr::Tcp {
            host: host.to_string(),
            port: port.unwrap_or(1883),
        }),
        "ws" => Ok(BrokerAddr::Ws {
            url: url.to_string(),
            port: port.unwrap_or(80),
        }),
        _ => Err(invalid()),
    }
}

fn generate_client_id() -> String {
    format!(
        "spriview-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_micros()
    )
}

fn mqtt_options(cfg: &BrokerConfig) -> Result<MqttOptions, BusError> {
    let client_id = if cfg.client_id.is_empty() {
        generate_client_id()
    } else {
        cfg.client_id.clone()
    };
    let mut opts = match parse_broker_url(&cfg.url)? {
        BrokerAddr::Tcp { host, port } => MqttOptions::new(client_id, host, port),
        #[cfg(feature = "websocket")]
        BrokerAddr::Ws { url, port } => {
            let mut opts = MqttOptions::new(client_id, url, port);
            opts.set_transport(rumqttc::Transport::Ws);
            opts
        }
        #[cfg(not(feature = "websocket"))]
        BrokerAddr::Ws { .. } => return Err(BusError::WebsocketDisabled),
    };
    opts.set_keep_alive(Duration::from_secs(cfg.keep_alive_secs.max(5)));
    Ok(opts)
}

/// Build the MQTT client without touching the network.
pub fn connect(cfg: &BrokerConfig) -> Result<(MqttPublisher, BusConnection), BusError> {
    let opts = mqtt_options(cfg)?;
    let (client, connection) = Client::new(opts, cfg.capacity.max(1));
    let publisher = MqttPublisher {
        client: client.clone(),
    };
    Ok((
        publisher,
        BusConnection {
            client,
            connection,
            url: cfg.url.clone(),
        },
    ))
}

/// Shared publish handle; cheap to clone.
#[derive(Clone)]
pub struct MqttPublisher {
    client: Client,
}

impl Publisher for MqttPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        // Never block the UI thread on a full request queue.
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload)?;
        Ok(())
    }
}

/// The not-yet-running event loop.
pub struct BusConnection {
    client: Client,
    connection: Connection,
    url: String,
}

impl BusConnection {
    /// Start the event-loop thread.
    ///
    /// Every filter is (re-)subscribed on each successful connection.
    /// `waker` is called after each forwarded event so the UI can repaint.
    pub fn spawn(
        self,
        filters: Vec<String>,
        waker: Option<Box<dyn Fn() + Send>>,
    ) -> std::io::Result<(Receiver<BusEvent>, JoinHandle<()>)> {
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = std::thread::Builder::new()
            .name("spriview-mqtt".to_string())
            .spawn(move || self.run(filters, tx, waker))?;
        Ok((rx, handle))
    }

    fn run(
        mut self,
        filters: Vec<String>,
        tx: Sender<BusEvent>,
        waker: Option<Box<dyn Fn() + Send>>,
    ) {
        let forward = |event: BusEvent| -> bool {
            let ok = tx.send(event).is_ok();
            if let Some(w) = &waker {
                w();
            }
            ok
        };

        log::info!("Connecting to broker {}", self.url);
        forward(BusEvent::Status(ConnectionStatus::Connecting));
        let mut connected = false;

        for notification in self.connection.iter() {
            let keep_going = match notification {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    log::info!("Connected to broker {}", self.url);
                    connected = true;
                    for filter in &filters {
                        if let Err(e) = self.client.try_subscribe(filter.as_str(), QoS::AtMostOnce) {
                            log::warn!("Failed to subscribe to {filter}: {e}");
                        }
                    }
                    forward(BusEvent::Status(ConnectionStatus::Connected))
                }
                Ok(Event::Incoming(Packet::Publish(p))) => forward(BusEvent::Message {
                    topic: p.topic.clone(),
                    payload: p.payload.to_vec(),
                }),
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    connected = false;
                    forward(BusEvent::Status(ConnectionStatus::Reconnecting))
                }
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Broker connection error: {e}");
                    let status = status_after_error(connected, &e.to_string());
                    connected = false;
                    let ok = forward(BusEvent::Status(status));
                    std::thread::sleep(RETRY_PAUSE);
                    ok
                }
            };
            if !keep_going {
                // UI side is gone.
                break;
            }
        }
        log::info!("Broker event loop stopped");
        forward(BusEvent::Status(ConnectionStatus::Offline(
            "event loop stopped".to_string(),
        )));
    }
}

/// Status reported after a failed poll; rumqttc reconnects on the next poll.
fn status_after_error(was_connected: bool, reason: &str) -> ConnectionStatus {
    if was_connected {
        ConnectionStatus::Reconnecting
    } else {
        ConnectionStatus::Retrying(reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_urls() {
        assert_eq!(
            parse_broker_url("mqtt://broker:1884").unwrap(),
            BrokerAddr::Tcp {
                host: "broker".into(),
                port: 1884
            }
        );
        assert_eq!(
            parse_broker_url("192.168.1.57").unwrap(),
            BrokerAddr::Tcp {
                host: "192.168.1.57".into(),
                port: 1883
            }
        );
        assert_eq!(
            parse_broker_url("ws://192.168.1.57:9001").unwrap(),
            BrokerAddr::Ws {
                url: "ws://192.168.1.57:9001".into(),
                port: 9001
            }
        );
    }

    #[test]
    fn rejects_unknown_scheme_and_bad_port() {
        assert!(parse_broker_url("http://host:80").is_err());
        assert!(parse_broker_url("mqtt://host:notaport").is_err());
        assert!(parse_broker_url("mqtt://:1883").is_err());
    }

    #[test]
    fn poll_errors_keep_retrying() {
        assert_eq!(status_after_error(true, "reset"), ConnectionStatus::Reconnecting);
        let status = status_after_error(false, "connection refused");
        assert_eq!(
            status,
            ConnectionStatus::Retrying("connection refused".to_string())
        );
        assert!(!status.is_connected());
        assert_eq!(status.to_string(), "Connecting (retrying: connection refused)");
    }

    #[test]
    fn generated_client_ids_are_prefixed() {
        assert!(generate_client_id().starts_with("spriview-"));
    }
}
