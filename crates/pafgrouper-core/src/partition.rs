//! Graph partitioner (spec §4.5).

use std::collections::{HashMap, HashSet};

use tracing::{instrument, trace};

use crate::config::InstancePeakThreshold;
use crate::types::{Connections, PeakId};

/// PeakID -> instance id. Instance ids are non-negative and need not be
/// contiguous until the assembler renormalises them (spec §4.6, I5).
pub type InstanceAssignment = HashMap<PeakId, i64>;

/// Walk `connections` in their given total order, applying the three
/// merge cases of spec §4.5, then apply the optional peak-count filter.
#[instrument(skip_all, fields(n_edge_types = connections.len()))]
pub fn assign_connections_to_instances(
    connections: &Connections,
    min_instance_peaks: InstancePeakThreshold,
    n_nodes: usize,
) -> InstanceAssignment {
    let mut assignment: InstanceAssignment = HashMap::new();

    for (edge_type, edge_connections) in connections {
        for conn in edge_connections {
            let u = PeakId { node_ind: edge_type.src_node_ind, peak_ind: conn.src_peak_ind };
            let v = PeakId { node_ind: edge_type.dst_node_ind, peak_ind: conn.dst_peak_ind };

            match (assignment.get(&u).copied(), assignment.get(&v).copied()) {
                (None, None) => {
                    let new_instance = assignment.values().copied().max().map_or(0, |m| m + 1);
                    assignment.insert(u, new_instance);
                    assignment.insert(v, new_instance);
                    trace!(instance = new_instance, "case 1: new instance");
                }
                (Some(u_inst), None) => {
                    assignment.insert(v, u_inst);
                    trace!(instance = u_inst, "case 2: assigned dst to src's instance");
                }
                (None, Some(v_inst)) => {
                    // Symmetric with the branch above: spec §4.5 Case 2 is
                    // phrased endpoint-agnostically ("the unknown endpoint"),
                    // so both directions are handled identically here.
                    assignment.insert(u, v_inst);
                    trace!(instance = v_inst, "case 2: assigned src to dst's instance");
                }
                (Some(u_inst), Some(v_inst)) => {
                    if u_inst == v_inst {
                        continue;
                    }
                    // (a) unconditional overwrite of v alone.
                    assignment.insert(v, u_inst);

                    // (b) node-type sets computed from the *post-overwrite*
                    // assignment state, matching the reference's exact
                    // order of operations.
                    let u_nodes: HashSet<usize> = assignment
                        .iter()
                        .filter(|(_, &inst)| inst == u_inst)
                        .map(|(p, _)| p.node_ind)
                        .collect();
                    let v_nodes: HashSet<usize> = assignment
                        .iter()
                        .filter(|(_, &inst)| inst == v_inst)
                        .map(|(p, _)| p.node_ind)
                        .collect();

                    if u_nodes.is_disjoint(&v_nodes) {
                        let to_merge: Vec<PeakId> = assignment
                            .iter()
                            .filter(|(_, &inst)| inst == v_inst)
                            .map(|(p, _)| *p)
                            .collect();
                        for p in to_merge {
                            assignment.insert(p, u_inst);
                        }
                        trace!(from = v_inst, to = u_inst, "case 3: merged disjoint components");
                    } else {
                        trace!(
                            from = v_inst,
                            to = u_inst,
                            "case 3: overlapping node types, no further merge"
                        );
                    }
                }
            }
        }
    }

    let threshold = min_instance_peaks.resolve(n_nodes);
    if threshold > 0 {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for &inst in assignment.values() {
            *counts.entry(inst).or_insert(0) += 1;
        }
        assignment.retain(|_, inst| counts.get(inst).copied().unwrap_or(0) >= threshold);
    }

    assignment
}
