//! Predictor assembler (spec §4.6): projects an `InstanceAssignment` back
//! into dense per-instance tensors.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2, Array3};
use tracing::instrument;

use crate::error::{PafGroupError, Result};
use crate::partition::InstanceAssignment;
use crate::types::{Connections, Peak, PeakId};

/// Dense per-instance output of one grouping call (spec §3
/// `PredictedInstance`). `coords`/`peak_scores` carry `NaN` at unfilled
/// `(instance, node)` slots (I4).
#[derive(Debug)]
pub struct PredictedInstances {
    /// `[M, N, 2]`, x then y, NaN where unfilled.
    pub coords: Array3<f32>,
    /// `[M, N]`, NaN where unfilled.
    pub peak_scores: Array2<f32>,
    /// `[M]`, sum of source-endpoint edge scores contributing to each
    /// instance.
    pub instance_scores: Array1<f32>,
}

/// Assemble dense tensors from the bucketed peaks, the matched
/// `Connections`, and the final (possibly filtered) assignment.
///
/// Returns [`PafGroupError::Invariant`] if a scored connection's two
/// endpoints end up mapped to different instances — §4.6 requires this to
/// be asserted and treated as a fatal partitioner bug, not silently
/// ignored.
#[instrument(skip_all)]
pub fn assemble(
    peaks: &[Vec<Peak>],
    connections: &Connections,
    assignment: &InstanceAssignment,
) -> Result<PredictedInstances> {
    let n_nodes = peaks.len();
    let instance_ids: BTreeSet<i64> = assignment.values().copied().collect();
    let m = instance_ids.len();
    let position: std::collections::HashMap<i64, usize> =
        instance_ids.into_iter().enumerate().map(|(pos, id)| (id, pos)).collect();

    let mut instance_scores = Array1::<f32>::zeros(m);
    for (edge_type, edge_connections) in connections {
        for conn in edge_connections {
            let src = PeakId { node_ind: edge_type.src_node_ind, peak_ind: conn.src_peak_ind };
            let dst = PeakId { node_ind: edge_type.dst_node_ind, peak_ind: conn.dst_peak_ind };

            let Some(&src_inst) = assignment.get(&src) else {
                continue;
            };
            let dst_inst = assignment.get(&dst).copied().ok_or_else(|| {
                PafGroupError::Invariant(format!(
                    "connection endpoint {dst:?} missing from assignment while source {src:?} is present"
                ))
            })?;
            if dst_inst != src_inst {
                return Err(PafGroupError::Invariant(format!(
                    "connection endpoints {src:?} and {dst:?} map to different instances ({src_inst} != {dst_inst})"
                )));
            }

            instance_scores[position[&src_inst]] += conn.score;
        }
    }

    let mut coords = Array3::<f32>::from_elem((m, n_nodes, 2), f32::NAN);
    let mut peak_scores = Array2::<f32>::from_elem((m, n_nodes), f32::NAN);
    for (&peak_id, &inst) in assignment {
        let pos = position[&inst];
        let peak = peaks[peak_id.node_ind][peak_id.peak_ind];
        coords[[pos, peak_id.node_ind, 0]] = peak.x;
        coords[[pos, peak_id.node_ind, 1]] = peak.y;
        peak_scores[[pos, peak_id.node_ind]] = peak.score;
    }

    Ok(PredictedInstances { coords, peak_scores, instance_scores })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeConnection, EdgeType};

    fn peak(x: f32, y: f32, score: f32) -> Peak {
        Peak { x, y, score, channel: 0 }
    }

    #[test]
    fn single_clean_match_assembles_to_one_instance() {
        // Spec §8 S1.
        let peaks = vec![vec![peak(2.0, 4.0, 0.9)], vec![peak(6.0, 4.0, 0.8)]];
        let edge_ab = EdgeType { src_node_ind: 0, dst_node_ind: 1 };
        let connections = vec![(edge_ab, vec![EdgeConnection { src_peak_ind: 0, dst_peak_ind: 0, score: 1.0 }])];
        let mut assignment = InstanceAssignment::new();
        assignment.insert(PeakId { node_ind: 0, peak_ind: 0 }, 0);
        assignment.insert(PeakId { node_ind: 1, peak_ind: 0 }, 0);

        let out = assemble(&peaks, &connections, &assignment).unwrap();
        assert_eq!(out.coords.shape(), &[1, 2, 2]);
        assert_eq!(out.coords[[0, 0, 0]], 2.0);
        assert_eq!(out.coords[[0, 1, 0]], 6.0);
        assert!((out.instance_scores[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unfilled_slots_are_nan_and_coincide() {
        let peaks = vec![vec![peak(1.0, 1.0, 0.5)], vec![]];
        let connections: Connections = Vec::new();
        let mut assignment = InstanceAssignment::new();
        assignment.insert(PeakId { node_ind: 0, peak_ind: 0 }, 0);

        let out = assemble(&peaks, &connections, &assignment).unwrap();
        assert!(out.coords[[0, 1, 0]].is_nan());
        assert!(out.coords[[0, 1, 1]].is_nan());
        assert!(out.peak_scores[[0, 1]].is_nan());
        assert!(!out.peak_scores[[0, 0]].is_nan());
    }

    #[test]
    fn mismatched_instances_are_a_fatal_invariant_error() {
        let peaks = vec![vec![peak(0.0, 0.0, 0.5)], vec![peak(1.0, 0.0, 0.5)]];
        let edge_ab = EdgeType { src_node_ind: 0, dst_node_ind: 1 };
        let connections = vec![(edge_ab, vec![EdgeConnection { src_peak_ind: 0, dst_peak_ind: 0, score: 1.0 }])];
        let mut assignment = InstanceAssignment::new();
        assignment.insert(PeakId { node_ind: 0, peak_ind: 0 }, 0);
        assignment.insert(PeakId { node_ind: 1, peak_ind: 0 }, 1);

        let err = assemble(&peaks, &connections, &assignment).unwrap_err();
        assert!(matches!(err, PafGroupError::Invariant(_)));
    }

    #[test]
    fn renormalises_instance_ids_to_consecutive_positions() {
        // Non-contiguous instance ids {0, 5} map to positions {0, 1}.
        let peaks = vec![vec![peak(0.0, 0.0, 0.5), peak(1.0, 1.0, 0.6)]];
        let connections: Connections = Vec::new();
        let mut assignment = InstanceAssignment::new();
        assignment.insert(PeakId { node_ind: 0, peak_ind: 0 }, 5);
        assignment.insert(PeakId { node_ind: 0, peak_ind: 1 }, 0);

        let out = assemble(&peaks, &connections, &assignment).unwrap();
        assert_eq!(out.coords.shape()[0], 2);
        // position 0 <- instance 0 <- peak_ind 1; position 1 <- instance 5 <- peak_ind 0.
        assert_eq!(out.coords[[0, 0, 0]], 1.0);
        assert_eq!(out.coords[[1, 0, 0]], 0.0);
    }
}
