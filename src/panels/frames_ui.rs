use std::cell::RefCell;
use std::rc::Rc;

use egui::Ui;
use egui_phosphor::regular::{BROOM, CHART_LINE, CROSSHAIR};

use super::panel_trait::{Panel, PanelState};
use crate::bus::Frame;
use crate::config::ChartConfig;
use crate::data::frames::FrameWindow;
use crate::events::{Dispatcher, SubscriptionId};
use crate::plot::{
    chart_identity, frame_chart_data, frame_chart_options, frame_series_style, ChartSlot,
};

/// Window, plot handle and chart settings of one frame chart.
pub struct FramesState {
    pub window: FrameWindow,
    pub chart: ChartSlot,
    field: String,
    channel_ids: Vec<u32>,
}

impl FramesState {
    pub fn new(cfg: &ChartConfig) -> Self {
        Self {
            window: FrameWindow::new(cfg.capacity, cfg.baseline),
            chart: ChartSlot::default(),
            field: cfg.field.clone(),
            channel_ids: cfg.channel_ids.clone(),
        }
    }

    /// Append a received frame and push the recomputed series to the chart.
    pub fn ingest(&mut self, frame: Frame) {
        self.window.push(frame);
        self.refresh_chart();
    }

    /// Use the latest frame as the new baseline.
    pub fn rezero(&mut self) {
        if self.window.rezero() {
            self.refresh_chart();
        }
    }

    /// Empty the window. The plot keeps its last data until the next frame.
    pub fn clear(&mut self) {
        self.window.clear();
    }

    fn refresh_chart(&mut self) {
        let Some(data) = frame_chart_data(&self.window) else {
            return;
        };
        let n_series = data.series_count();
        let baseline = self.window.baseline();
        self.chart.feed(data, || {
            frame_chart_options(&self.field, baseline, &self.channel_ids, n_series)
        });
        // Frames may grow wider than the one the plot was created from.
        if let Some(handle) = self.chart.handle_mut() {
            let ids = &self.channel_ids;
            handle.extend_series(n_series, |k| frame_series_style(ids, k));
        }
    }
}

/// Live chart of the frames published by one source.
pub struct FramesPanel {
    pub state: PanelState,
    data: Rc<RefCell<FramesState>>,
    topic: String,
    subscription: Option<SubscriptionId>,
}

impl FramesPanel {
    pub fn new(cfg: &ChartConfig, topic: impl Into<String>) -> Self {
        Self {
            state: PanelState::new(chart_identity(&cfg.field, cfg.baseline), CHART_LINE),
            data: Rc::new(RefCell::new(FramesState::new(cfg))),
            topic: topic.into(),
            subscription: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Shared handle to the chart state.
    pub fn data(&self) -> Rc<RefCell<FramesState>> {
        self.data.clone()
    }
}

impl Panel for FramesPanel {
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
        let id = dispatcher.subscribe_weak(
            self.topic.clone(),
            &self.data,
            |state: &mut FramesState, _topic, frame: Frame| state.ingest(frame),
        );
        self.subscription = Some(id);
    }

    fn detach(&mut self, dispatcher: &mut Dispatcher) {
        if let Some(id) = self.subscription.take() {
            dispatcher.unsubscribe(id);
        }
    }

    fn render_panel(&mut self, ui: &mut Ui) {
        let mut data = self.data.borrow_mut();
        data.chart.show(ui, "Waiting for frames…");

        ui.horizontal_wrapped(|ui| {
            if data.window.baseline()
                && ui
                    .button(format!("{CROSSHAIR} Re-zero"))
                    .on_hover_text("Use the latest frame as the zero baseline")
                    .clicked()
            {
                data.rezero();
            }
            if ui
                .button(format!("{BROOM} Clear"))
                .on_hover_text("Drop all frames and reset the max mean")
                .clicked()
            {
                data.clear();
            }
            ui.separator();
            if let Some(stats) = data.window.stats() {
                ui.monospace(stats.summary());
                ui.separator();
            }
            ui.monospace(format!("Max mean: {:.3}", data.window.all_time_max_mean()));
            ui.separator();
            ui.weak(format!(
                "{}/{} frames ({} received)",
                data.window.len(),
                data.window.capacity(),
                data.window.received()
            ));
        });
    }
}
