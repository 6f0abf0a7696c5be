use std::cell::RefCell;
use std::rc::Rc;

use egui::Ui;
use egui_phosphor::regular::CHART_BAR;

use super::panel_trait::{Panel, PanelState};
use crate::bus::Histograms;
use crate::data::histogram::HistogramState;
use crate::events::{Dispatcher, SubscriptionId};
use crate::plot::{histogram_chart_data, histogram_chart_options, ChartSlot};

#[derive(Default)]
pub struct HistogramData {
    pub state: HistogramState,
    pub chart: ChartSlot,
}

impl HistogramData {
    /// Replace the histograms and redraw all three series.
    pub fn ingest(&mut self, hists: Histograms) {
        let data = histogram_chart_data(&hists);
        self.state.replace(hists);
        self.chart.feed(data, histogram_chart_options);
    }
}

/// Flat, white and normalized histograms of the latest camera frame.
pub struct HistogramPanel {
    pub state: PanelState,
    data: Rc<RefCell<HistogramData>>,
    topic: String,
    subscription: Option<SubscriptionId>,
}

impl HistogramPanel {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            state: PanelState::new("Histogram", CHART_BAR),
            data: Rc::new(RefCell::new(HistogramData::default())),
            topic: topic.into(),
            subscription: None,
        }
    }

    pub fn data(&self) -> Rc<RefCell<HistogramData>> {
        self.data.clone()
    }
}

impl Panel for HistogramPanel {
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
        self.subscription = Some(dispatcher.subscribe_weak(
            self.topic.clone(),
            &self.data,
            |data: &mut HistogramData, _topic, hists: Histograms| data.ingest(hists),
        ));
    }

    fn detach(&mut self, dispatcher: &mut Dispatcher) {
        if let Some(id) = self.subscription.take() {
            dispatcher.unsubscribe(id);
        }
    }

    fn render_panel(&mut self, ui: &mut Ui) {
        let data = self.data.borrow();
        data.chart.show(ui, "Waiting for histograms…");
    }
}
