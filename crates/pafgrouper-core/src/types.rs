//! Core data model shared across the grouping pipeline (spec §3).

/// A detected body-part peak: image-pixel coordinates, detection score,
/// and the body-part/channel index it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub x: f32,
    pub y: f32,
    pub score: f32,
    pub channel: usize,
}

/// Identifies a peak uniquely within its channel's bucketed peak list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeakId {
    pub node_ind: usize,
    pub peak_ind: usize,
}

/// A directed skeleton edge between two channel (body-part) indices.
/// Immutable once built from a [`crate::config::PafScorerConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeType {
    pub src_node_ind: usize,
    pub dst_node_ind: usize,
}

/// A single matched connection within a fixed [`EdgeType`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeConnection {
    pub src_peak_ind: usize,
    pub dst_peak_ind: usize,
    pub score: f32,
}

/// `EdgeType -> ordered list of EdgeConnection`, in exactly the order
/// edges were iterated in config order and connections were matched
/// within each edge. A `HashMap` would not preserve this order, which
/// the partitioner (§4.5) depends on for determinism.
pub type Connections = Vec<(EdgeType, Vec<EdgeConnection>)>;
