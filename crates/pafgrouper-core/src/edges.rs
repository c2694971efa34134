//! Edge scorer & matcher (spec §4.3).

use ndarray::{Array2, ArrayView3};
use tracing::debug;

use crate::assignment::solve_rectangular;
use crate::consts::EPSILON;
use crate::sampler::sample_edge_line;
use crate::scorer::score_pair;
use crate::types::{EdgeConnection, Peak};

/// A large finite cost standing in for "no viable candidate" in the
/// dense score matrix. Kept finite (rather than infinite) so the
/// Hungarian solver's potential bookkeeping never produces NaN from an
/// `inf - inf`, while still being far outside the range of any real PAF
/// score (~[-2, 1]) so it is never preferred over a finite alternative.
const UNVIABLE_COST: f32 = 1.0e6;

/// One matched pair from §4.3, carrying both the distance-penalised score
/// and the independently tracked `fraction_correct`. Spec §9 flags that
/// the reference implementation accidentally overwrites its
/// `fraction_correct` container with line scores; this keeps the two
/// values genuinely separate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchedEdge {
    pub src_peak_ind: usize,
    pub dst_peak_ind: usize,
    pub score: f32,
    pub fraction_correct: f32,
}

impl From<MatchedEdge> for EdgeConnection {
    fn from(m: MatchedEdge) -> Self {
        EdgeConnection {
            src_peak_ind: m.src_peak_ind,
            dst_peak_ind: m.dst_peak_ind,
            score: m.score,
        }
    }
}

/// Score every (source, destination) candidate pair for one edge type and
/// solve the resulting rectangular assignment.
///
/// Per spec §4.3: an empty source or destination list produces an empty
/// match list. Pairs whose peaks coincide are filtered out before
/// scoring (spec §9's zero-length-edge open question, resolved here by
/// refusing to score them rather than propagating a NaN/inf score).
pub fn score_and_match_edge(
    paf: ArrayView3<f32>,
    src_peaks: &[Peak],
    dst_peaks: &[Peak],
    stride: u32,
    n_points: usize,
    max_edge_length: f32,
    min_edge_score: f32,
) -> Vec<MatchedEdge> {
    if src_peaks.is_empty() || dst_peaks.is_empty() {
        return Vec::new();
    }

    let mut cost = Array2::from_elem((src_peaks.len(), dst_peaks.len()), UNVIABLE_COST);
    let mut scores = Array2::<f32>::zeros((src_peaks.len(), dst_peaks.len()));
    let mut fractions = Array2::<f32>::zeros((src_peaks.len(), dst_peaks.len()));
    let mut viable = vec![vec![false; dst_peaks.len()]; src_peaks.len()];

    for (i, src) in src_peaks.iter().enumerate() {
        for (j, dst) in dst_peaks.iter().enumerate() {
            let dx = dst.x - src.x;
            let dy = dst.y - src.y;
            if (dx * dx + dy * dy).sqrt() <= EPSILON {
                debug!(i, j, "skipping zero-length candidate pair");
                continue;
            }
            let samples = sample_edge_line(paf, src, dst, stride, n_points);
            if let Some(pair) = score_pair(&samples, src, dst, max_edge_length, min_edge_score) {
                cost[[i, j]] = -pair.score;
                scores[[i, j]] = pair.score;
                fractions[[i, j]] = pair.fraction_correct;
                viable[i][j] = true;
            }
        }
    }

    solve_rectangular(&cost)
        .into_iter()
        .filter(|&(i, j)| viable[i][j])
        .map(|(i, j)| MatchedEdge {
            src_peak_ind: i,
            dst_peak_ind: j,
            score: scores[[i, j]],
            fraction_correct: fractions[[i, j]],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn uniform_horizontal_field(h: usize, w: usize) -> Array3<f32> {
        Array3::from_shape_fn((h, w, 2), |(_, _, k)| if k == 0 { 1.0 } else { 0.0 })
    }

    #[test]
    fn empty_lists_produce_no_matches() {
        let paf = uniform_horizontal_field(8, 8);
        let dst = vec![Peak { x: 6.0, y: 4.0, score: 0.8, channel: 1 }];
        assert!(score_and_match_edge(paf.view(), &[], &dst, 1, 10, 128.0, 0.05).is_empty());
        let src = vec![Peak { x: 2.0, y: 4.0, score: 0.9, channel: 0 }];
        assert!(score_and_match_edge(paf.view(), &src, &[], 1, 10, 128.0, 0.05).is_empty());
    }

    #[test]
    fn single_clean_match() {
        // Spec §8 S1.
        let paf = uniform_horizontal_field(8, 8);
        let src = vec![Peak { x: 2.0, y: 4.0, score: 0.9, channel: 0 }];
        let dst = vec![Peak { x: 6.0, y: 4.0, score: 0.8, channel: 1 }];
        let matched = score_and_match_edge(paf.view(), &src, &dst, 1, 10, 128.0, 0.05);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].src_peak_ind, 0);
        assert_eq!(matched[0].dst_peak_ind, 0);
        assert!((matched[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn two_rows_disambiguated_by_lsa() {
        // Spec §8 S2/S3: rows y=1 and y=7 each carry a clean horizontal
        // PAF; peaks on mismatched rows should never be crossed.
        let mut paf = Array3::<f32>::zeros((8, 8, 2));
        for c in 0..8 {
            paf[[1, c, 0]] = 1.0;
            paf[[7, c, 0]] = 1.0;
        }
        let src = vec![
            Peak { x: 2.0, y: 1.0, score: 0.9, channel: 0 },
            Peak { x: 2.0, y: 7.0, score: 0.9, channel: 0 },
        ];
        let dst = vec![
            Peak { x: 6.0, y: 1.0, score: 0.8, channel: 1 },
            Peak { x: 6.0, y: 7.0, score: 0.8, channel: 1 },
        ];
        let matched = score_and_match_edge(paf.view(), &src, &dst, 1, 10, 128.0, 0.05);
        assert_eq!(matched.len(), 2);
        let mut pairs: Vec<(usize, usize)> =
            matched.iter().map(|m| (m.src_peak_ind, m.dst_peak_ind)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn zero_length_candidate_never_matched() {
        let paf = uniform_horizontal_field(8, 8);
        // Source and destination share image coordinates.
        let src = vec![Peak { x: 4.0, y: 4.0, score: 0.9, channel: 0 }];
        let dst = vec![Peak { x: 4.0, y: 4.0, score: 0.8, channel: 1 }];
        let matched = score_and_match_edge(paf.view(), &src, &dst, 1, 10, 128.0, 0.05);
        assert!(matched.is_empty());
    }
}
