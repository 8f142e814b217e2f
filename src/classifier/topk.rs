//! Top-K selection over the model's per-label scores.

use crate::types::Recognition;

/// How many results a classification call surfaces.
pub const RESULT_COUNT: usize = 3;

/// Reduces a raw score vector to the `k` highest-confidence labels,
/// ranked descending.
///
/// Labels tie-break by ascending index, so the result is deterministic
/// for a given input. Score slots beyond the end of `labels` are reported
/// as `"unknown"` rather than failing. Returns `min(k, scores.len())`
/// entries; an empty score vector yields an empty result, not an error.
pub fn select_top(scores: &[u8], labels: &[String], k: usize) -> Vec<Recognition> {
    let mut ranked: Vec<(usize, u8)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);

    ranked
        .into_iter()
        .map(|(index, score)| {
            let label = labels.get(index).map(String::as_str).unwrap_or("unknown");
            Recognition::new(index, label, f32::from(score))
        })
        .collect()
}
