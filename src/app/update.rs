//! Per-frame update logic for [`DashboardApp`].
//!
//! Each frame drains whatever the transport thread queued, routes messages
//! through the [`Dispatcher`](crate::events::Dispatcher) and then draws the
//! layout. Decoding and window updates therefore always happen on the UI
//! thread, one message at a time.

use std::sync::mpsc::TryRecvError;

use eframe::egui;

use crate::bus::{BusEvent, ConnectionStatus};

use super::DashboardApp;

impl DashboardApp {
    /// Apply a single transport event.
    pub fn handle_event(&mut self, event: BusEvent) {
        match event {
            BusEvent::Message { topic, payload } => {
                let delivered = self.dispatcher.dispatch(&topic, &payload);
                if delivered == 0 {
                    log::trace!("No subscriber for {topic}");
                }
            }
            BusEvent::Status(status) => self.status.set_status(status),
        }
    }

    /// Apply every queued transport event. Returns how many were applied.
    pub fn drain_bus(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(rx) = &self.bus_rx else {
                break;
            };
            match rx.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.bus_rx = None;
                    self.status
                        .set_status(ConnectionStatus::Offline("transport stopped".into()));
                    break;
                }
            }
        }
        applied
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.theme.apply(ctx);
            self.theme_applied = true;
        }
        self.drain_bus();
        self.render(ctx);
    }
}
