//! Dashboard application.
//!
//! | Sub-module | Responsibility |
//! | ---------- | -------------- |
//! | [`update`] | Per-frame bus ingestion and the [`eframe::App`] impl |
//! | [`layout`] | Header, status line, tile grid and control column |
//! | [`run`]    | [`run_dashboard()`] entry point and icon loading |

mod layout;
mod run;
mod update;

pub use run::run_dashboard;

use std::rc::Rc;
use std::sync::mpsc::Receiver;

use crate::bus::{BusEvent, Publisher};
use crate::color_scheme::ColorScheme;
use crate::config::DashboardConfig;
use crate::events::Dispatcher;
use crate::panels::{
    ControlsPanel, FramesPanel, HistogramPanel, ImagePanel, Panel, StatusPanel,
};

/// The whole dashboard: panels, their bus subscriptions and the bus channel.
pub struct DashboardApp {
    pub title: String,
    pub theme: ColorScheme,
    theme_applied: bool,

    /// Routes bus deliveries to panel callbacks.
    pub dispatcher: Dispatcher,
    /// Events from the transport thread; `None` until the bus is started
    /// and after the transport went away.
    bus_rx: Option<Receiver<BusEvent>>,

    pub status: StatusPanel,
    pub charts: Vec<FramesPanel>,
    pub images: Vec<ImagePanel>,
    pub histogram: Option<HistogramPanel>,
    pub controls: Option<ControlsPanel>,
}

impl DashboardApp {
    /// Build every configured panel and register its subscriptions.
    pub fn new(cfg: &DashboardConfig, publisher: Rc<dyn Publisher>) -> Self {
        let topics = &cfg.topics;
        let mut app = Self {
            title: cfg.title.clone(),
            theme: cfg.theme,
            theme_applied: false,
            dispatcher: Dispatcher::new(),
            bus_rx: None,
            status: StatusPanel::new(cfg.broker.url.clone()),
            charts: cfg
                .charts
                .iter()
                .map(|c| FramesPanel::new(c, topics.frames_for(&c.source)))
                .collect(),
            images: cfg
                .images
                .iter()
                .map(|ch| ImagePanel::new(ch.clone(), topics.images_for(ch)))
                .collect(),
            histogram: cfg
                .histogram
                .then(|| HistogramPanel::new(topics.histograms.clone())),
            controls: cfg.controls.enabled.then(|| {
                ControlsPanel::new(
                    &cfg.controls,
                    publisher,
                    &topics.commands,
                    &topics.responses,
                )
            }),
        };
        app.attach_all();
        app
    }

    /// Hand over the receiving end of the transport channel.
    pub fn set_bus(&mut self, rx: Receiver<BusEvent>) {
        self.bus_rx = Some(rx);
    }

    pub fn has_bus(&self) -> bool {
        self.bus_rx.is_some()
    }

    /// Topic filters the broker subscription must cover.
    pub fn subscription_filters(&self) -> Vec<String> {
        self.dispatcher.filters()
    }

    fn panels_mut(&mut self) -> Vec<&mut dyn Panel> {
        let mut out: Vec<&mut dyn Panel> = Vec::new();
        for c in &mut self.charts {
            out.push(c);
        }
        for i in &mut self.images {
            out.push(i);
        }
        if let Some(h) = &mut self.histogram {
            out.push(h);
        }
        if let Some(c) = &mut self.controls {
            out.push(c);
        }
        out
    }

    fn attach_all(&mut self) {
        let mut dispatcher = std::mem::take(&mut self.dispatcher);
        for p in self.panels_mut() {
            p.attach(&mut dispatcher);
        }
        self.dispatcher = dispatcher;
    }

    /// Drop every subscription; later deliveries reach no panel.
    pub fn detach_all(&mut self) {
        let mut dispatcher = std::mem::take(&mut self.dispatcher);
        for p in self.panels_mut() {
            p.detach(&mut dispatcher);
        }
        self.dispatcher = dispatcher;
    }
}
