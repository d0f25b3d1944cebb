use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Beta, Distribution, Open01};

use crate::domain::estimate::ThreePointEstimate;

/// Draws one random duration for a three point estimate.
pub trait DurationSampler {
    fn sample(&mut self, estimate: &ThreePointEstimate) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionKind {
    #[default]
    Normal,
    Beta,
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionKind::Normal => f.write_str("normal"),
            DistributionKind::Beta => f.write_str("beta"),
        }
    }
}

impl FromStr for DistributionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "normal" => Ok(DistributionKind::Normal),
            "beta" | "beta-pert" => Ok(DistributionKind::Beta),
            other => Err(format!("unknown distribution: {other}")),
        }
    }
}

/// Normal approximation of the PERT distribution: mean `(O + 4M + P) / 6`,
/// spread `(P - O) / 6`, clamped into the estimate's bounds.
pub struct NormalPertSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> NormalPertSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DurationSampler for NormalPertSampler<R> {
    fn sample(&mut self, estimate: &ThreePointEstimate) -> f64 {
        let u1: f64 = self.rng.sample(Open01);
        let u2: f64 = self.rng.sample(Open01);
        let z = box_muller(u1, u2);
        let duration = duration_from_z_score(estimate, z);
        tracing::trace!(
            optimistic = estimate.optimistic,
            most_likely = estimate.most_likely,
            pessimistic = estimate.pessimistic,
            z,
            duration,
            "sampled normal duration"
        );
        duration
    }
}

/// Cosine branch of the Box-Muller transform. Both inputs must lie in (0, 1).
pub fn box_muller(u1: f64, u2: f64) -> f64 {
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// `mean + z * spread` clamped into `[min(O, P), max(O, P)]`.
pub fn duration_from_z_score(estimate: &ThreePointEstimate, z: f64) -> f64 {
    let (low, high) = estimate.ordered_bounds();
    (estimate.pert_mean() + z * estimate.spread()).clamp(low, high)
}

/// Classic Beta-PERT with shape parameters derived from the estimate.
pub struct BetaPertSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> BetaPertSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DurationSampler for BetaPertSampler<R> {
    fn sample(&mut self, estimate: &ThreePointEstimate) -> f64 {
        let (low, high) = estimate.ordered_bounds();
        let range = high - low;
        if range < f64::EPSILON {
            return low;
        }

        let most_likely = f64::from(estimate.most_likely).clamp(low, high);
        let alpha = 1.0 + 4.0 * ((most_likely - low) / range);
        let beta = 1.0 + 4.0 * ((high - most_likely) / range);
        // alpha and beta are always within [1, 5] here.
        let duration = match Beta::new(alpha, beta) {
            Ok(distribution) => (low + distribution.sample(&mut self.rng) * range).clamp(low, high),
            Err(_) => most_likely,
        };
        tracing::trace!(alpha, beta, duration, "sampled beta duration");
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn estimate(optimistic: u32, most_likely: u32, pessimistic: u32) -> ThreePointEstimate {
        ThreePointEstimate {
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    #[test]
    fn box_muller_cosine_branch() {
        // -2 ln(u1) == 1 when u1 == e^-0.5
        let u1 = (-0.5_f64).exp();
        assert!((box_muller(u1, 0.0) - 1.0).abs() < 1e-12);
        assert!((box_muller(u1, 0.5) + 1.0).abs() < 1e-12);
        assert!(box_muller(u1, 0.25).abs() < 1e-12);
    }

    #[test]
    fn duration_from_z_score_shifts_by_spread_and_clamps() {
        let estimate = estimate(6, 10, 16);
        assert!((duration_from_z_score(&estimate, 0.0) - 62.0 / 6.0).abs() < 1e-12);
        assert!((duration_from_z_score(&estimate, 1.0) - 72.0 / 6.0).abs() < 1e-12);
        assert_eq!(duration_from_z_score(&estimate, 10.0), 16.0);
        assert_eq!(duration_from_z_score(&estimate, -10.0), 6.0);
    }

    #[test]
    fn inverted_bounds_clamp_into_swapped_interval() {
        let estimate = estimate(16, 10, 6);
        assert_eq!(duration_from_z_score(&estimate, 10.0), 6.0);
        assert_eq!(duration_from_z_score(&estimate, -10.0), 16.0);
    }

    #[test]
    fn degenerate_estimate_always_returns_the_single_value() {
        let estimate = estimate(4, 4, 4);
        let mut normal = NormalPertSampler::new(StdRng::seed_from_u64(1));
        let mut beta = BetaPertSampler::new(StdRng::seed_from_u64(1));
        for _ in 0..50 {
            assert_eq!(normal.sample(&estimate), 4.0);
            assert_eq!(beta.sample(&estimate), 4.0);
        }
    }

    #[test]
    fn distribution_kind_parses_names() {
        assert_eq!("normal".parse::<DistributionKind>(), Ok(DistributionKind::Normal));
        assert_eq!("Beta-PERT".parse::<DistributionKind>(), Ok(DistributionKind::Beta));
        assert!("uniform".parse::<DistributionKind>().is_err());
    }

    proptest! {
        #[test]
        fn normal_samples_stay_within_bounds(
            optimistic in 0u32..200,
            most_likely in 1u32..200,
            pessimistic in 0u32..200,
            seed in any::<u64>(),
        ) {
            let estimate = estimate(optimistic, most_likely, pessimistic);
            let (low, high) = estimate.ordered_bounds();
            let mut sampler = NormalPertSampler::new(StdRng::seed_from_u64(seed));
            for _ in 0..20 {
                let duration = sampler.sample(&estimate);
                prop_assert!(duration >= low && duration <= high, "{} outside [{}, {}]", duration, low, high);
            }
        }

        #[test]
        fn beta_samples_stay_within_bounds(
            optimistic in 0u32..200,
            most_likely in 0u32..200,
            pessimistic in 0u32..200,
            seed in any::<u64>(),
        ) {
            let estimate = estimate(optimistic, most_likely, pessimistic);
            let (low, high) = estimate.ordered_bounds();
            let mut sampler = BetaPertSampler::new(StdRng::seed_from_u64(seed));
            for _ in 0..20 {
                let duration = sampler.sample(&estimate);
                prop_assert!(duration >= low && duration <= high, "{} outside [{}, {}]", duration, low, high);
            }
        }
    }
}
