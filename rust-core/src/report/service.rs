//! Builds summaries and plain-text reports from prediction results.

use std::fmt::Write;

use crate::inference::domain::{Label, PredictionResult};

use super::domain::{display_name, ConfidenceLevel, ProbabilityRow, ResultSummary, DISCLAIMER};

const BAR_WIDTH: usize = 20;

/// Normalise a live or simulated result for display.
///
/// All canonical labels appear in the breakdown (missing ones at zero),
/// followed by any extra keys the backend sent. Rows are sorted by
/// probability, highest first; ties keep that order.
pub fn summarize(result: &PredictionResult) -> ResultSummary {
    let mut rows: Vec<ProbabilityRow> = Label::ALL
        .iter()
        .map(|label| ProbabilityRow {
            key: label.as_str().to_string(),
            display_name: label.display_name().to_string(),
            probability: result.probability(*label),
        })
        .collect();

    rows.extend(
        result
            .all_probabilities
            .iter()
            .filter(|(key, _)| key.parse::<Label>().is_err())
            .map(|(key, probability)| ProbabilityRow {
                key: key.clone(),
                display_name: display_name(key),
                probability: *probability,
            }),
    );
    rows.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    let level = ConfidenceLevel::from_confidence(result.confidence);
    ResultSummary {
        headline: display_name(&result.prediction),
        confidence: result.confidence,
        level,
        level_label: level.label(),
        interpretation: level.description(),
        rows,
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Plain-text report suitable for a terminal or a saved file.
pub fn render_text(summary: &ResultSummary) -> String {
    let name_width = summary
        .rows
        .iter()
        .map(|row| row.display_name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "Prediction:  {}", summary.headline);
    let _ = writeln!(
        out,
        "Confidence:  {} ({})",
        percent(summary.confidence),
        summary.level_label
    );
    let _ = writeln!(out, "{}", summary.interpretation);
    let _ = writeln!(out);
    let _ = writeln!(out, "Class probabilities");
    for row in &summary.rows {
        let filled = (row.probability.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<width$}  {:>6}  {}",
            row.display_name,
            percent(row.probability),
            "#".repeat(filled),
            width = name_width
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{DISCLAIMER}");
    out
}
