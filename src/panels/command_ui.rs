//! Control widgets that publish commands and show command responses.

use std::cell::RefCell;
use std::rc::Rc;

use egui::Ui;
use egui_phosphor::regular::{PAPER_PLANE_TILT, SLIDERS};

use super::panel_trait::{Panel, PanelState};
use crate::bus::{CommandMessage, CommandResponse, CommandType, Publisher};
use crate::config::{ControlsConfig, SliderConfig};
use crate::data::responses::ResponseSlot;
use crate::events::{Dispatcher, SubscriptionId};

/// Publishes `{CmdType, Value: 0}` when clicked.
pub struct CommandButton {
    cmd: CommandType,
    publisher: Rc<dyn Publisher>,
    topic: String,
}

impl CommandButton {
    pub fn new(cmd: CommandType, publisher: Rc<dyn Publisher>, topic: impl Into<String>) -> Self {
        Self {
            cmd,
            publisher,
            topic: topic.into(),
        }
    }

    pub fn command(&self) -> CommandType {
        self.cmd
    }

    /// Publish the button's command, as a click does.
    pub fn activate(&self) {
        let msg = CommandMessage::trigger(self.cmd);
        if let Err(e) = self.publisher.publish_command(&self.topic, &msg) {
            log::warn!("Failed to publish {}: {e}", self.cmd);
        }
    }

    pub fn render(&self, ui: &mut Ui) {
        if ui.button(self.cmd.name()).clicked() {
            self.activate();
        }
    }
}

/// Publishes `{CmdType, Value}` when the slider is released.
pub struct CommandSlider {
    cfg: SliderConfig,
    value: f64,
    /// Last value sent, shown under the slider.
    sent: Option<f64>,
    publisher: Rc<dyn Publisher>,
    topic: String,
}

impl CommandSlider {
    pub fn new(cfg: SliderConfig, publisher: Rc<dyn Publisher>, topic: impl Into<String>) -> Self {
        Self {
            value: cfg.min,
            cfg,
            sent: None,
            publisher,
            topic: topic.into(),
        }
    }

    pub fn command(&self) -> CommandType {
        self.cfg.cmd
    }

    pub fn sent(&self) -> Option<f64> {
        self.sent
    }

    /// Publish `value` (clamped to the slider range), as a release does.
    pub fn release(&mut self, value: f64) {
        let value = value.clamp(self.cfg.min, self.cfg.max);
        self.value = value;
        let msg = CommandMessage::new(self.cfg.cmd, value);
        match self.publisher.publish_command(&self.topic, &msg) {
            Ok(()) => self.sent = Some(value),
            Err(e) => log::warn!("Failed to publish {}: {e}", self.cfg.cmd),
        }
    }

    pub fn render(&mut self, ui: &mut Ui) {
        ui.group(|ui| {
            ui.strong(self.cfg.cmd.name());
            let resp = ui.add(
                egui::Slider::new(&mut self.value, self.cfg.min..=self.cfg.max)
                    .integer()
                    .clamping(egui::SliderClamping::Always),
            );
            // Dragging publishes once on release; clicks and keyboard edits publish immediately.
            if resp.drag_stopped() || (resp.changed() && !resp.dragged()) {
                self.release(self.value);
            }
            match self.sent {
                Some(v) => ui.monospace(format!("{v}")),
                None => ui.weak("not sent"),
            };
        });
    }
}

/// Shows the value of the latest response matching one command type.
pub struct ResponseListener {
    slot: Rc<RefCell<ResponseSlot>>,
    topic: String,
    subscription: Option<SubscriptionId>,
}

impl ResponseListener {
    pub fn new(cmd: CommandType, topic: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(ResponseSlot::new(cmd))),
            topic: topic.into(),
            subscription: None,
        }
    }

    pub fn command(&self) -> CommandType {
        self.slot.borrow().command()
    }

    /// Displayed value; `None` until a matching response arrived.
    pub fn value(&self) -> Option<String> {
        self.slot.borrow().value().map(str::to_string)
    }

    pub fn attach(&mut self, dispatcher: &mut Dispatcher) {
        if self.subscription.is_some() {
            return;
        }
        self.subscription = Some(dispatcher.subscribe_weak(
            self.topic.clone(),
            &self.slot,
            |slot: &mut ResponseSlot, _topic, resp: CommandResponse| {
                slot.offer(&resp);
            },
        ));
    }

    pub fn detach(&mut self, dispatcher: &mut Dispatcher) {
        if let Some(id) = self.subscription.take() {
            dispatcher.unsubscribe(id);
        }
    }

    pub fn render(&self, ui: &mut Ui) {
        let slot = self.slot.borrow();
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.weak(slot.command().name());
                ui.monospace(slot.value().unwrap_or(""));
            });
            if let Some(at) = slot.updated_at() {
                ui.weak(at.format("%H:%M:%S").to_string());
            }
        });
    }
}

/// The control column: sliders, command buttons and response listeners.
pub struct ControlsPanel {
    pub state: PanelState,
    pub sliders: Vec<CommandSlider>,
    pub buttons: Vec<CommandButton>,
    pub listeners: Vec<ResponseListener>,
}

impl ControlsPanel {
    pub fn new(
        cfg: &ControlsConfig,
        publisher: Rc<dyn Publisher>,
        commands_topic: &str,
        responses_topic: &str,
    ) -> Self {
        Self {
            state: PanelState::new("Controls", SLIDERS),
            sliders: cfg
                .sliders
                .iter()
                .cloned()
                .map(|s| CommandSlider::new(s, publisher.clone(), commands_topic))
                .collect(),
            buttons: cfg
                .buttons
                .iter()
                .map(|&cmd| CommandButton::new(cmd, publisher.clone(), commands_topic))
                .collect(),
            listeners: cfg
                .listeners
                .iter()
                .map(|&cmd| ResponseListener::new(cmd, responses_topic))
                .collect(),
        }
    }
}

impl Panel for ControlsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn attach(&mut self, dispatcher: &mut Dispatcher) {
        for l in &mut self.listeners {
            l.attach(dispatcher);
        }
    }

    fn detach(&mut self, dispatcher: &mut Dispatcher) {
        for l in &mut self.listeners {
            l.detach(dispatcher);
        }
    }

    fn render_panel(&mut self, ui: &mut Ui) {
        for slider in &mut self.sliders {
            slider.render(ui);
        }
        if !self.listeners.is_empty() {
            ui.add_space(4.0);
            for listener in &self.listeners {
                listener.render(ui);
            }
        }
        if !self.buttons.is_empty() {
            ui.add_space(4.0);
            ui.group(|ui| {
                ui.label(format!("{PAPER_PLANE_TILT} Commands"));
                for button in &self.buttons {
                    button.render(ui);
                }
            });
        }
    }
}
