/// Duration estimates of a single task in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreePointEstimate {
    pub optimistic: u32,
    pub most_likely: u32,
    pub pessimistic: u32,
}

impl ThreePointEstimate {
    /// Builds an estimate, deriving the missing bounds from `most_likely`.
    /// A bound of zero counts as missing.
    pub fn new(most_likely: u32, optimistic: Option<u32>, pessimistic: Option<u32>) -> Self {
        Self {
            optimistic: optimistic
                .filter(|value| *value > 0)
                .unwrap_or_else(|| default_optimistic(most_likely)),
            most_likely,
            pessimistic: pessimistic
                .filter(|value| *value > 0)
                .unwrap_or_else(|| default_pessimistic(most_likely)),
        }
    }

    pub fn from_most_likely(most_likely: u32) -> Self {
        Self::new(most_likely, None, None)
    }

    /// PERT weighted mean `(O + 4M + P) / 6`.
    pub fn pert_mean(&self) -> f64 {
        (f64::from(self.optimistic) + 4.0 * f64::from(self.most_likely) + f64::from(self.pessimistic))
            / 6.0
    }

    /// Standard deviation proxy `(P - O) / 6`. Negative for inverted bounds.
    pub fn spread(&self) -> f64 {
        (f64::from(self.pessimistic) - f64::from(self.optimistic)) / 6.0
    }

    /// Bounds ordered as `(low, high)` regardless of how they were entered.
    pub fn ordered_bounds(&self) -> (f64, f64) {
        let optimistic = f64::from(self.optimistic);
        let pessimistic = f64::from(self.pessimistic);
        (optimistic.min(pessimistic), optimistic.max(pessimistic))
    }
}

/// `max(1, floor(0.6 * M))`
pub fn default_optimistic(most_likely: u32) -> u32 {
    ((f64::from(most_likely) * 0.6).floor() as u32).max(1)
}

/// `ceil(1.6 * M)`
pub fn default_pessimistic(most_likely: u32) -> u32 {
    (f64::from(most_likely) * 1.6).ceil() as u32
}
