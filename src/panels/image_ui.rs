use std::cell::RefCell;
use std::rc::Rc;

use egui::{TextureHandle, TextureOptions, Ui};
use egui_phosphor::regular::IMAGE;

use super::panel_trait::{Panel, PanelState};
use crate::bus::EncodedImage;
use crate::data::image::ImageSlot;
use crate::events::{Dispatcher, SubscriptionId};
use crate::plot::{CHART_HEIGHT, CHART_WIDTH};

/// Latest still image of one image channel.
pub struct ImagePanel {
    pub state: PanelState,
    channel: String,
    slot: Rc<RefCell<ImageSlot>>,
    texture: Option<TextureHandle>,
    topic: String,
    subscription: Option<SubscriptionId>,
}

impl ImagePanel {
    pub fn new(channel: impl Into<String>, topic: impl Into<String>) -> Self {
        let channel = channel.into();
        Self {
            state: PanelState::new(format!("SPRi Image ({channel})"), IMAGE),
            channel,
            slot: Rc::new(RefCell::new(ImageSlot::default())),
            texture: None,
            topic: topic.into(),
            subscription: None,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn slot(&self) -> Rc<RefCell<ImageSlot>> {
        self.slot.clone()
    }

    /// Upload a newly received image, reusing the texture once it exists.
    fn upload_pending(&mut self, ctx: &egui::Context) {
        let Some(image) = self.slot.borrow_mut().take_pending() else {
            return;
        };
        match &mut self.texture {
            Some(tex) => tex.set(image, TextureOptions::LINEAR),
            None => {
                let name = format!("spri_image_{}", self.channel);
                self.texture = Some(ctx.load_texture(name, image, TextureOptions::LINEAR));
            }
        }
    }
}

impl Panel for ImagePanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn attach(&mut self, dispatcher: &mut Dispatcher) {
        if self.subscription.is_some() {
            return;
        }
        let channel = self.channel.clone();
        self.subscription = Some(dispatcher.subscribe_weak(
            self.topic.clone(),
            &self.slot,
            move |slot: &mut ImageSlot, _topic, img: EncodedImage| {
                if let Err(e) = slot.replace(&img) {
                    log::debug!("Dropping undecodable image on channel {channel}: {e}");
                }
            },
        ));
    }

    fn detach(&mut self, dispatcher: &mut Dispatcher) {
        if let Some(id) = self.subscription.take() {
            dispatcher.unsubscribe(id);
        }
    }

    fn render_panel(&mut self, ui: &mut Ui) {
        self.upload_pending(ui.ctx());
        let size = egui::vec2(CHART_WIDTH, CHART_HEIGHT);
        match &self.texture {
            Some(tex) => {
                ui.add(egui::Image::new(tex).fit_to_exact_size(size))
                    .on_hover_text(self.state.title.as_str());
            }
            None => {
                ui.add_sized(
                    size,
                    egui::Label::new(egui::RichText::new(self.state.title.as_str()).weak()),
                );
            }
        }
    }
}
