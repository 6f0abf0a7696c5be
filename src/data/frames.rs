//! Bounded window of recent telemetry frames with optional zero baseline.

use std::collections::VecDeque;

use crate::bus::Frame;
use crate::data::stats::{AllTimeMax, RollingStats, STATS_DEPTH};

/// Default number of frames kept per chart.
pub const DEFAULT_CAPACITY: usize = 100;

/// The frame window behind one chart.
///
/// Holds at most `capacity` frames in arrival order and recomputes the
/// rolling statistics after every append.
#[derive(Debug, Clone)]
pub struct FrameWindow {
    frames: VecDeque<Frame>,
    capacity: usize,
    baseline: bool,
    zero: Option<Frame>,
    stats: Option<RollingStats>,
    all_time_max: AllTimeMax,
    received: u64,
}

impl Default for FrameWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, false)
    }
}

impl FrameWindow {
    pub fn new(capacity: usize, baseline: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            baseline,
            zero: None,
            stats: None,
            all_time_max: AllTimeMax::default(),
            received: 0,
        }
    }

    /// Append a frame, evicting the oldest when full, and recompute.
    ///
    /// In baseline mode the first frame of a session (window empty before
    /// the append) becomes the zero frame.
    pub fn push(&mut self, frame: Frame) {
        if self.frames.is_empty() && self.baseline {
            self.zero = Some(frame.clone());
        }
        while self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
        self.received += 1;
        self.recompute();
    }

    /// Replace the zero frame with the most recently received frame.
    ///
    /// Returns `false` (and keeps the current zero) when the window is empty.
    pub fn rezero(&mut self) -> bool {
        match self.frames.back() {
            Some(latest) => {
                self.zero = Some(latest.clone());
                self.recompute();
                true
            }
            None => false,
        }
    }

    /// Empty the window and reset the all-time max mean.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.stats = None;
        self.all_time_max.reset();
    }

    /// Replace the whole window, e.g. when restarting a session.
    pub fn reset(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.clear();
        self.zero = None;
        for frame in frames {
            self.push(frame);
        }
    }

    fn recompute(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        let skip = self.frames.len().saturating_sub(STATS_DEPTH);
        let samples = self
            .frames
            .iter()
            .skip(skip)
            .flat_map(|f| (0..f.values.len()).map(move |i| (f, i)))
            .map(|(f, i)| self.displayed_value(f, i).unwrap_or(f64::NAN));
        self.stats = RollingStats::from_samples(samples);
        if let Some(stats) = &self.stats {
            self.all_time_max.update(stats.mean);
        }
    }

    /// Value of channel `channel` of `frame` relative to the zero frame.
    ///
    /// Without a zero frame (or when the zero frame lacks the channel) the
    /// raw value is returned.
    pub fn displayed_value(&self, frame: &Frame, channel: usize) -> Option<f64> {
        let raw = *frame.values.get(channel)?;
        let offset = self
            .zero
            .as_ref()
            .and_then(|z| z.values.get(channel))
            .copied()
            .unwrap_or(0.0);
        Some(raw - offset)
    }

    /// Number of channels, taken from the oldest frame in the window.
    pub fn channel_count(&self) -> usize {
        self.frames.front().map(|f| f.values.len()).unwrap_or(0)
    }

    pub fn frames(&self) -> impl ExactSizeIterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    pub fn latest(&self) -> Option<&Frame> {
        self.frames.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn baseline(&self) -> bool {
        self.baseline
    }

    pub fn zero_frame(&self) -> Option<&Frame> {
        self.zero.as_ref()
    }

    /// Rolling statistics over the last [`STATS_DEPTH`] frames, if any.
    pub fn stats(&self) -> Option<&RollingStats> {
        self.stats.as_ref()
    }

    pub fn all_time_max_mean(&self) -> f64 {
        self.all_time_max.value()
    }

    /// Frames received since start-up, including evicted and cleared ones.
    pub fn received(&self) -> u64 {
        self.received
    }
}
