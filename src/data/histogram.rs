//! Latest histogram set; no history is kept.

use crate::bus::Histograms;

#[derive(Debug, Clone, Default)]
pub struct HistogramState {
    current: Option<Histograms>,
    received: u64,
}

impl HistogramState {
    /// Discard the previous set and keep `hists`.
    pub fn replace(&mut self, hists: Histograms) {
        self.current = Some(hists);
        self.received += 1;
    }

    pub fn current(&self) -> Option<&Histograms> {
        self.current.as_ref()
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}
