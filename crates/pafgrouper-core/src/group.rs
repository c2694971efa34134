//! Top-level orchestrator wiring §4.1-4.6 into the single operation of
//! spec §6: `group(pafs, flat_peaks, flat_peak_scores, flat_channels,
//! config) -> (coords, peak_scores, instance_scores)`.

use ndarray::{Array3, Array4, ArrayView1, ArrayView2};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::assemble::{assemble, PredictedInstances};
use crate::bucket::bucket_peaks;
use crate::config::PafScorerConfig;
use crate::consts::PARALLEL_EDGE_THRESHOLD;
use crate::edges::score_and_match_edge;
use crate::error::{PafGroupError, Result};
use crate::paf::PafField;
use crate::partition::assign_connections_to_instances;
use crate::types::{Connections, EdgeType, Peak};

/// Flat per-frame peak inputs, as they arrive at the §6 boundary before
/// bucketing: `flat_peaks[P,2]`, `flat_peak_scores[P]`,
/// `flat_channels[P]` in `[0, N)`.
pub struct FlatPeaks<'a> {
    pub coords: ArrayView2<'a, f32>,
    pub scores: ArrayView1<'a, f32>,
    pub channels: &'a [usize],
}

/// Run the full grouping pipeline for one frame.
///
/// `pafs` may be either `[H, W, 2*E]` or `[H, W, E, 2]`; `PafField`
/// normalises it. Returns a [`PafGroupError::Shape`] if `flat_peaks`,
/// `flat_peak_scores`, and `flat_channels` disagree in length, or if a
/// channel index is out of `[0, N)`.
#[instrument(skip_all, fields(n_edges = config.n_edges(), n_nodes = config.n_nodes()))]
pub fn group(
    pafs_hw_2e: Option<Array3<f32>>,
    pafs_hw_e_2: Option<Array4<f32>>,
    flat: FlatPeaks<'_>,
    config: &PafScorerConfig,
) -> Result<PredictedInstances> {
    let n_nodes = config.n_nodes();
    let p = flat.coords.shape()[0];
    if flat.scores.len() != p || flat.channels.len() != p {
        return Err(PafGroupError::Shape(format!(
            "flat_peaks ({p}), flat_peak_scores ({}), flat_channels ({}) disagree in length",
            flat.scores.len(),
            flat.channels.len()
        )));
    }
    for &c in flat.channels {
        if c >= n_nodes {
            return Err(PafGroupError::Shape(format!(
                "channel index {c} out of range [0, {n_nodes})"
            )));
        }
    }

    let paf_field = match (pafs_hw_2e, pafs_hw_e_2) {
        (Some(data), None) => PafField::from_hw_2e(data, config.n_edges())?,
        (None, Some(data)) => PafField::from_hw_e_2(data, config.n_edges())?,
        _ => {
            return Err(PafGroupError::Config(
                "exactly one of pafs_hw_2e or pafs_hw_e_2 must be supplied".into(),
            ))
        }
    };

    let peaks: Vec<Peak> = (0..p)
        .map(|i| Peak {
            x: flat.coords[[i, 0]],
            y: flat.coords[[i, 1]],
            score: flat.scores[i],
            channel: flat.channels[i],
        })
        .collect();
    let buckets = bucket_peaks(&peaks, n_nodes);

    let connections = score_all_edges(&paf_field, &buckets, config);

    let assignment =
        assign_connections_to_instances(&connections, config.min_instance_peaks, n_nodes);
    info!(n_instances = {
        let mut ids: Vec<i64> = assignment.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    });

    assemble(&buckets, &connections, &assignment)
}

/// Score and match every edge type, in parallel above
/// [`PARALLEL_EDGE_THRESHOLD`] edges, always gathering results back into
/// config edge order before returning — spec §5's determinism
/// requirement that the partitioner sees a fixed total order regardless
/// of scheduling.
#[instrument(skip_all)]
fn score_all_edges(
    paf_field: &PafField,
    buckets: &[Vec<Peak>],
    config: &PafScorerConfig,
) -> Connections {
    let edge_inds = config.edge_inds();

    let score_one = |edge_ind: usize| -> (EdgeType, Vec<crate::types::EdgeConnection>) {
        let (src_node, dst_node) = edge_inds[edge_ind];
        let edge_type = EdgeType { src_node_ind: src_node, dst_node_ind: dst_node };
        let plane = paf_field.edge_plane(edge_ind);
        let matched = score_and_match_edge(
            plane,
            &buckets[src_node],
            &buckets[dst_node],
            config.pafs_stride,
            config.n_points,
            config.max_edge_length,
            config.min_edge_score,
        );
        let conns = matched.into_iter().map(Into::into).collect();
        (edge_type, conns)
    };

    if edge_inds.len() >= PARALLEL_EDGE_THRESHOLD {
        (0..edge_inds.len()).into_par_iter().map(score_one).collect()
    } else {
        (0..edge_inds.len()).map(score_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    fn config_ab() -> PafScorerConfig {
        PafScorerConfig::new(vec!["A".into(), "B".into()], vec![("A".into(), "B".into())], 1)
            .unwrap()
    }

    #[test]
    fn s1_single_clean_match() {
        let paf = Array3::from_shape_fn((8, 8, 2), |(_, _, k)| if k == 0 { 1.0 } else { 0.0 });
        let coords = Array2::from_shape_vec((2, 2), vec![2.0, 4.0, 6.0, 4.0]).unwrap();
        let scores = ndarray::Array1::from_vec(vec![0.9, 0.8]);
        let channels = vec![0usize, 1usize];
        let flat = FlatPeaks { coords: coords.view(), scores: scores.view(), channels: &channels };

        let out = group(Some(paf), None, flat, &config_ab()).unwrap();
        assert_eq!(out.coords.shape()[0], 1);
        assert!((out.coords[[0, 0, 0]] - 2.0).abs() < 1e-6);
        assert!((out.coords[[0, 1, 0]] - 6.0).abs() < 1e-6);
        assert!((out.instance_scores[0] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_mismatched_flat_lengths() {
        let paf = Array3::<f32>::zeros((8, 8, 2));
        let coords = Array2::<f32>::zeros((2, 2));
        let scores = ndarray::Array1::<f32>::zeros(1);
        let channels = vec![0usize, 1usize];
        let flat = FlatPeaks { coords: coords.view(), scores: scores.view(), channels: &channels };
        assert!(group(Some(paf), None, flat, &config_ab()).is_err());
    }

    #[test]
    fn rejects_out_of_range_channel() {
        let paf = Array3::<f32>::zeros((8, 8, 2));
        let coords = Array2::<f32>::zeros((1, 2));
        let scores = ndarray::Array1::<f32>::zeros(1);
        let channels = vec![5usize];
        let flat = FlatPeaks { coords: coords.view(), scores: scores.view(), channels: &channels };
        assert!(group(Some(paf), None, flat, &config_ab()).is_err());
    }

    #[test]
    fn p4_empty_edge_produces_no_instances() {
        let paf = Array3::<f32>::zeros((8, 8, 2));
        let coords = Array2::<f32>::zeros((0, 2));
        let scores = ndarray::Array1::<f32>::zeros(0);
        let channels: Vec<usize> = Vec::new();
        let flat = FlatPeaks { coords: coords.view(), scores: scores.view(), channels: &channels };
        let out = group(Some(paf), None, flat, &config_ab()).unwrap();
        assert_eq!(out.coords.shape()[0], 0);
    }
}
