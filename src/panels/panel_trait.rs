use egui::Ui;

use crate::events::Dispatcher;

/// Title, icon and visibility shared by every panel.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub title: String,
    pub icon: &'static str,
    pub visible: bool,
}

impl PanelState {
    pub fn new(title: impl Into<String>, icon: &'static str) -> Self {
        Self {
            title: title.into(),
            icon,
            visible: true,
        }
    }
}

/// A dashboard tile: subscribes to the bus and renders itself.
pub trait Panel {
    fn state(&self) -> &PanelState;
    fn state_mut(&mut self) -> &mut PanelState;

    fn title(&self) -> &str {
        &self.state().title
    }

    fn title_and_icon(&self) -> String {
        format!("{} {}", self.state().icon, self.state().title)
    }

    /// Register bus subscriptions. Called once after construction.
    fn attach(&mut self, _dispatcher: &mut Dispatcher) {}

    /// Drop bus subscriptions; no callback reaches the panel afterwards.
    fn detach(&mut self, _dispatcher: &mut Dispatcher) {}

    fn render_panel(&mut self, ui: &mut Ui);
}
