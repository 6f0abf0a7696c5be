//! SPRi dashboard crate root: re-exports and module wiring.
//!
//! The dashboard subscribes to an MQTT broker and shows live frame charts,
//! histograms and camera images, with a control column that publishes
//! instrument commands and shows their responses.
//!
//! - `bus`: wire messages, topic layout and the MQTT transport
//! - `events`: topic-filtered dispatch of bus messages to panels
//! - `data`: frame window, rolling statistics and display state
//! - `plot`: chart data/options and the persistent plot handle
//! - `panels`: the egui tiles (charts, images, histogram, controls)
//! - `config`: YAML configuration
//! - `app`: window layout and the eframe entry point

pub mod app;
pub mod bus;
pub mod color_scheme;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod panels;
pub mod plot;

// Public re-exports for a compact external API
pub use app::{run_dashboard, DashboardApp};
pub use bus::{
    BusEvent, CommandMessage, CommandResponse, CommandType, ConnectionStatus, Frame, Histograms,
    Publisher,
};
pub use config::DashboardConfig;
pub use data::frames::FrameWindow;
pub use error::{BusError, ConfigError, DashboardError, DecodeError};
pub use events::Dispatcher;
