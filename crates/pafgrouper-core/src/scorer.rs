//! Pair scorer (spec §4.2).

use crate::consts::EPSILON;
use crate::types::Peak;

/// The two scalars produced by scoring one sampled line against a
/// candidate source/destination pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairScore {
    /// Distance-penalised mean alignment score.
    pub score: f32,
    /// Fraction of samples whose alignment exceeds `min_edge_score`.
    pub fraction_correct: f32,
}

/// Score a sampled PAF line against the straight-line direction between
/// two peaks.
///
/// Returns `None` when `src` and `dst` coincide — a zero-length edge is
/// undefined per spec §4.2 and §9's open question; callers must never
/// route such a pair here (see [`crate::edges::score_and_match_edge`],
/// which filters them before sampling).
pub fn score_pair(
    samples: &[[f32; 2]],
    src: &Peak,
    dst: &Peak,
    max_edge_length: f32,
    min_edge_score: f32,
) -> Option<PairScore> {
    let vx = dst.x - src.x;
    let vy = dst.y - src.y;
    let r = (vx * vx + vy * vy).sqrt();
    if r <= EPSILON {
        return None;
    }
    let ux = vx / r;
    let uy = vy / r;

    let mut sum = 0.0f32;
    let mut correct = 0usize;
    for s in samples {
        let alignment = s[0] * ux + s[1] * uy;
        sum += alignment;
        if alignment > min_edge_score {
            correct += 1;
        }
    }
    let mean_score = sum / samples.len() as f32;
    let penalty = (max_edge_length / r - 1.0).min(0.0);

    Some(PairScore {
        score: mean_score + penalty,
        fraction_correct: correct as f32 / samples.len() as f32,
    })
}
