//! Demo-mode prediction simulator.
//!
//! Produces a randomized but internally consistent [`PredictionResult`]
//! without any model. The draw is a pure function of a [`UniformSource`],
//! so tests can replay exact sequences; [`Simulator`] wraps it with an
//! artificial inference delay.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;

use crate::common::config::DEFAULT_DEMO_LATENCY_MS;

use super::domain::{Label, PredictionResult};

/// Decimal digits kept on every emitted probability.
pub const PROBABILITY_DECIMALS: i32 = 4;

/// How often a class is drawn and how confident the simulator is about it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClassProfile {
    pub label: Label,
    /// Exclusive upper bound of this class's slice of `[0, 1)`. Slices are
    /// contiguous in [`CLASS_PROFILES`] order, so a slice's width is its
    /// prevalence.
    pub upper_bound: f64,
    pub confidence_floor: f64,
    pub confidence_span: f64,
}

/// Prevalence slices: glioma 40%, meningioma 25%, pituitary 20%, no tumor 15%.
/// Every confidence window sits above 0.8.
pub const CLASS_PROFILES: [ClassProfile; 4] = [
    ClassProfile {
        label: Label::Glioma,
        upper_bound: 0.40,
        confidence_floor: 0.88,
        confidence_span: 0.10,
    },
    ClassProfile {
        label: Label::Meningioma,
        upper_bound: 0.65,
        confidence_floor: 0.82,
        confidence_span: 0.12,
    },
    ClassProfile {
        label: Label::Pituitary,
        upper_bound: 0.85,
        confidence_floor: 0.85,
        confidence_span: 0.10,
    },
    ClassProfile {
        label: Label::NoTumor,
        upper_bound: 1.00,
        confidence_floor: 0.90,
        confidence_span: 0.08,
    },
];

/// Source of uniform draws in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapter turning any `rand` generator into a [`UniformSource`].
pub struct RngSource<R>(pub R);

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Class profile owning the slice that contains `r`.
pub fn profile_for(r: f64) -> &'static ClassProfile {
    CLASS_PROFILES
        .iter()
        .find(|profile| r < profile.upper_bound)
        .unwrap_or(&CLASS_PROFILES[CLASS_PROFILES.len() - 1])
}

/// Round half away from zero to `decimals` digits.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Draw one simulated result.
///
/// Consumes five values: class, confidence, then one weight per
/// non-winning class in canonical order.
pub fn sample<S: UniformSource + ?Sized>(source: &mut S) -> PredictionResult {
    let profile = profile_for(source.next_unit());
    let offset = source.next_unit().clamp(0.0, 1.0) * profile.confidence_span;
    let confidence = round_to(profile.confidence_floor + offset, PROBABILITY_DECIMALS);
    let remaining = 1.0 - confidence;

    let others: Vec<Label> = Label::ALL
        .into_iter()
        .filter(|label| *label != profile.label)
        .collect();
    let weights: Vec<f64> = others
        .iter()
        .map(|_| source.next_unit().max(0.0))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut all_probabilities = BTreeMap::new();
    for (label, weight) in others.iter().zip(&weights) {
        let share = if total > 0.0 {
            weight / total
        } else {
            1.0 / others.len() as f64
        };
        all_probabilities.insert(
            label.as_str().to_string(),
            round_to(share * remaining, PROBABILITY_DECIMALS),
        );
    }
    // The winning entry carries the rounded confidence exactly.
    all_probabilities.insert(profile.label.as_str().to_string(), confidence);

    PredictionResult {
        prediction: profile.label.as_str().to_string(),
        confidence,
        all_probabilities,
        gradcam_url: None,
    }
}

/// Stateless simulator with a fixed artificial latency.
#[derive(Copy, Clone, Debug)]
pub struct Simulator {
    latency: Duration,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEMO_LATENCY_MS))
    }
}

impl Simulator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Simulator that answers without waiting.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Wait out the artificial latency, then draw a fresh result.
    pub async fn simulate(&self) -> PredictionResult {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let result = sample(&mut RngSource(rand::rng()));
        tracing::debug!(
            ev = "simulated",
            prediction = %result.prediction,
            confidence = result.confidence,
            "demo prediction drawn"
        );
        result
    }
}
