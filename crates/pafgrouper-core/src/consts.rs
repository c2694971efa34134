/// Default maximum edge length in pixels, beyond which the distance
/// penalty in the pair scorer kicks in (spec §6).
pub const DEFAULT_MAX_EDGE_LENGTH: f32 = 128.0;

/// Default minimum per-sample alignment score counted towards
/// `fraction_correct` (spec §6).
pub const DEFAULT_MIN_EDGE_SCORE: f32 = 0.05;

/// Default number of points sampled along a candidate edge's line
/// integral (spec §6).
pub const DEFAULT_N_POINTS: usize = 10;

/// Minimum edge count before edge scoring/matching is fanned out across
/// Rayon threads. Below this, the sequential path avoids thread-pool
/// overhead for skeletons with only a handful of edges.
pub const PARALLEL_EDGE_THRESHOLD: usize = 4;

/// Below this, a candidate pair's source and destination peaks are
/// treated as coincident (spec §4.2: "If r = 0 the pair score is
/// undefined").
pub const EPSILON: f32 = 1e-10;
