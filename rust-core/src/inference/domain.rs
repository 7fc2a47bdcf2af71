//! Domain definitions for tumor classification results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prediction string a backend emits when its top class falls below
/// [`LOW_CONFIDENCE_THRESHOLD`].
pub const LOW_CONFIDENCE_PREDICTION: &str = "Low Confidence Prediction";

/// Backend cut-off under which a prediction is reported as low confidence.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.60;

/// The closed set of classification categories.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Glioma,
    Meningioma,
    Pituitary,
    NoTumor,
}

impl Label {
    /// Canonical order, shared by the simulator and report rendering.
    pub const ALL: [Label; 4] = [
        Label::Glioma,
        Label::Meningioma,
        Label::Pituitary,
        Label::NoTumor,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Glioma => "glioma",
            Label::Meningioma => "meningioma",
            Label::Pituitary => "pituitary",
            Label::NoTumor => "notumor",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Glioma => "Glioma",
            Label::Meningioma => "Meningioma",
            Label::Pituitary => "Pituitary",
            Label::NoTumor => "No Tumor",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A string that is not one of the canonical labels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

/// Output of both the live and simulated prediction paths.
///
/// `prediction` stays a string because a backend may answer with
/// [`LOW_CONFIDENCE_PREDICTION`] or a class this crate does not know.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub confidence: f64,
    #[serde(default)]
    pub all_probabilities: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradcam_url: Option<String>,
}

impl PredictionResult {
    /// The predicted label, if it is a canonical one.
    pub fn label(&self) -> Option<Label> {
        self.prediction.parse().ok()
    }

    pub fn is_low_confidence(&self) -> bool {
        self.prediction == LOW_CONFIDENCE_PREDICTION
    }

    /// Probability assigned to `label`; absent entries count as zero.
    pub fn probability(&self, label: Label) -> f64 {
        self.all_probabilities
            .get(label.as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum over every entry in the probability map.
    pub fn probability_mass(&self) -> f64 {
        self.all_probabilities.values().sum()
    }
}
