/// Running mean (Welford's update).
///
/// Accumulates one sample at a time without summing the whole signal
/// first, which keeps the mean accurate for long envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineStats {
    count: u64,
    mean: f64,
}

impl OnlineStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds statistics over a whole slice.
    pub fn from_slice(samples: &[f64]) -> Self {
        let mut stats = Self::new();
        samples.iter().for_each(|&x| stats.update(x));
        stats
    }

    /// Adds one sample.
    pub fn update(&mut self, sample: f64) {
        self.count += 1;
        self.mean += (sample - self.mean) / self.count as f64;
    }

    /// Mean of the samples seen so far; zero before the first update.
    pub fn mean(&self) -> f64 {
        self.mean
    }
}
