use egui::{Color32, Ui};
use egui_phosphor::regular::{WIFI_HIGH, WIFI_SLASH};

use super::panel_trait::{Panel, PanelState};
use crate::bus::ConnectionStatus;

/// Connection-status line.
pub struct StatusPanel {
    pub state: PanelState,
    status: ConnectionStatus,
    since: chrono::DateTime<chrono::Local>,
    broker: String,
}

impl StatusPanel {
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            state: PanelState::new("Connection", WIFI_HIGH),
            status: ConnectionStatus::default(),
            since: chrono::Local::now(),
            broker: broker.into(),
        }
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if status != self.status {
            match &status {
                ConnectionStatus::Offline(reason) => {
                    log::warn!("Broker {} offline: {reason}", self.broker)
                }
                other => log::info!("Broker {}: {other}", self.broker),
            }
            self.status = status;
            self.since = chrono::Local::now();
        }
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }
}

impl Panel for StatusPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui) {
        let (icon, color) = match self.status {
            ConnectionStatus::Connected => (WIFI_HIGH, Color32::from_rgb(82, 196, 26)),
            ConnectionStatus::Connecting
            | ConnectionStatus::Retrying(_)
            | ConnectionStatus::Reconnecting => {
                (WIFI_HIGH, Color32::from_rgb(250, 173, 20))
            }
            ConnectionStatus::Offline(_) => (WIFI_SLASH, Color32::from_rgb(245, 34, 45)),
        };
        ui.horizontal(|ui| {
            ui.colored_label(color, icon);
            ui.label(format!("Connection status: {}", self.status));
            ui.weak(format!(
                "{} · since {}",
                self.broker,
                self.since.format("%H:%M:%S")
            ));
        });
    }
}
