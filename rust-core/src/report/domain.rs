//! Display-side interpretation of a prediction.

use serde::Serialize;

use crate::inference::domain::{Label, LOW_CONFIDENCE_PREDICTION, LOW_CONFIDENCE_THRESHOLD};

/// Lower bound of the high confidence bucket.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Research-use notice printed under every report.
pub const DISCLAIMER: &str = "This tool is for educational and research purposes only. \
It is NOT a substitute for professional medical diagnosis. \
Always consult qualified healthcare professionals for medical decisions.";

/// Coarse interpretation of a confidence value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// `High` from 0.85, `Medium` from 0.60, `Low` below.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::High
        } else if confidence >= LOW_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High Confidence",
            ConfidenceLevel::Medium => "Medium Confidence",
            ConfidenceLevel::Low => "Low Confidence",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "The model is highly confident in this classification.",
            ConfidenceLevel::Medium => {
                "Moderate confidence. Clinical verification recommended."
            }
            ConfidenceLevel::Low => "Low confidence. Manual review strongly recommended.",
        }
    }
}

/// Human readable name for a prediction or probability key.
pub fn display_name(key: &str) -> String {
    if let Ok(label) = key.parse::<Label>() {
        return label.display_name().to_string();
    }
    if key == LOW_CONFIDENCE_PREDICTION {
        return "Low Confidence".to_string();
    }
    key.to_string()
}

/// One line of the probability breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub key: String,
    pub display_name: String,
    pub probability: f64,
}

/// Normalised view of a [`PredictionResult`](crate::inference::PredictionResult).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSummary {
    pub headline: String,
    pub confidence: f64,
    pub level: ConfidenceLevel,
    pub level_label: &'static str,
    pub interpretation: &'static str,
    pub rows: Vec<ProbabilityRow>,
}
