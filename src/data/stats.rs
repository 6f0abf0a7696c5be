//! Rolling statistics over the tail of the frame window.

/// Number of most recent frames the rolling statistics cover.
pub const STATS_DEPTH: usize = 5;

/// Min, max and mean over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl RollingStats {
    /// Compute statistics over `samples`, skipping NaN values.
    ///
    /// Returns `None` when there is nothing to average, so a degenerate
    /// window is suppressed rather than shown as NaN.
    pub fn from_samples<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in samples.into_iter().filter(|v| !v.is_nan()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;
        mean.is_finite().then_some(Self {
            min,
            max,
            mean,
            count,
        })
    }

    /// `"mean [min : max]"` with three decimals.
    pub fn summary(&self) -> String {
        format!("{:.3} [{:.3} : {:.3}]", self.mean, self.min, self.max)
    }
}

/// Running maximum of the rolling mean.
///
/// Starts at zero, never decreases, and only goes back to zero through
/// [`AllTimeMax::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AllTimeMax(f64);

impl AllTimeMax {
    pub fn update(&mut self, mean: f64) {
        if mean.is_finite() && mean > self.0 {
            self.0 = mean;
        }
    }

    pub fn reset(&mut self) {
        self.0 = 0.0;
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}
