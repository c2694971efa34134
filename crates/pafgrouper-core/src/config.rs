//! Skeleton / scorer configuration (spec §6, §7).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_EDGE_LENGTH, DEFAULT_MIN_EDGE_SCORE, DEFAULT_N_POINTS};
use crate::error::{PafGroupError, Result};

/// Absolute or fractional threshold for the minimum number of assigned
/// peaks an instance must retain to survive §4.5's optional filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstancePeakThreshold {
    /// A caller-supplied minimum peak count.
    Absolute(usize),
    /// A fraction of the total node count, resolved via `floor(f * n_nodes)`.
    Fraction(f32),
}

impl Default for InstancePeakThreshold {
    fn default() -> Self {
        InstancePeakThreshold::Absolute(0)
    }
}

impl fmt::Display for InstancePeakThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstancePeakThreshold::Absolute(n) => write!(f, "{n} peaks"),
            InstancePeakThreshold::Fraction(frac) => write!(f, "{:.0}% of nodes", frac * 100.0),
        }
    }
}

impl InstancePeakThreshold {
    /// Resolve to an absolute peak count given the total node count.
    pub fn resolve(&self, n_nodes: usize) -> usize {
        match *self {
            InstancePeakThreshold::Absolute(n) => n,
            InstancePeakThreshold::Fraction(f) => (f * n_nodes as f32).floor() as usize,
        }
    }
}

/// Configuration for the PAF grouping stage, per spec §6.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PafScorerConfig {
    /// Ordered list of node (body-part) names; their position is the
    /// channel index used throughout the pipeline.
    pub part_names: Vec<String>,
    /// Ordered list of `(src, dst)` node name pairs; duplicates forbidden.
    pub edges: Vec<(String, String)>,
    pub pafs_stride: u32,
    #[serde(default = "default_max_edge_length")]
    pub max_edge_length: f32,
    #[serde(default = "default_min_edge_score")]
    pub min_edge_score: f32,
    #[serde(default = "default_n_points")]
    pub n_points: usize,
    #[serde(default)]
    pub min_instance_peaks: InstancePeakThreshold,

    /// `(src_node_ind, dst_node_ind)` resolved once at construction time,
    /// the way the reference `PAFScorer.__attrs_post_init__` resolves
    /// `edges` (node names) into `edge_inds` (channel indices) up front
    /// rather than re-resolving them on every call.
    #[serde(skip, default)]
    pub(crate) edge_inds: Vec<(usize, usize)>,
}

fn default_max_edge_length() -> f32 {
    DEFAULT_MAX_EDGE_LENGTH
}
fn default_min_edge_score() -> f32 {
    DEFAULT_MIN_EDGE_SCORE
}
fn default_n_points() -> usize {
    DEFAULT_N_POINTS
}

impl PafScorerConfig {
    /// Build a config with spec-default thresholds, validating and
    /// resolving `edges` immediately.
    pub fn new(
        part_names: Vec<String>,
        edges: Vec<(String, String)>,
        pafs_stride: u32,
    ) -> Result<Self> {
        let mut config = Self {
            part_names,
            edges,
            pafs_stride,
            max_edge_length: DEFAULT_MAX_EDGE_LENGTH,
            min_edge_score: DEFAULT_MIN_EDGE_SCORE,
            n_points: DEFAULT_N_POINTS,
            min_instance_peaks: InstancePeakThreshold::default(),
            edge_inds: Vec::new(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn n_nodes(&self) -> usize {
        self.part_names.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Resolved `(src_node_ind, dst_node_ind)` pairs in config order.
    /// Populated by [`Self::validate`]; empty until then (e.g. right
    /// after deserializing from TOML/JSON, which skips this field).
    pub fn edge_inds(&self) -> &[(usize, usize)] {
        &self.edge_inds
    }

    /// Validate configuration and resolve `edges` to `edge_inds`, per
    /// spec §7's `ConfigError` cases. Must be called once after
    /// constructing or deserializing a config before passing it to
    /// [`crate::group::group`].
    pub fn validate(&mut self) -> Result<()> {
        if self.pafs_stride == 0 {
            return Err(PafGroupError::Config("pafs_stride must be positive".into()));
        }
        if self.n_points == 0 {
            return Err(PafGroupError::Config("n_points must be positive".into()));
        }
        if let InstancePeakThreshold::Fraction(f) = self.min_instance_peaks {
            if !(f > 0.0 && f <= 1.0) {
                return Err(PafGroupError::Config(format!(
                    "fractional min_instance_peaks must be in (0, 1], got {f}"
                )));
            }
        }

        let mut seen = HashSet::new();
        let mut edge_inds = Vec::with_capacity(self.edges.len());
        for (src, dst) in &self.edges {
            let src_ind = self
                .part_names
                .iter()
                .position(|p| p == src)
                .ok_or_else(|| PafGroupError::Config(format!("unknown part name in edge: {src}")))?;
            let dst_ind = self
                .part_names
                .iter()
                .position(|p| p == dst)
                .ok_or_else(|| PafGroupError::Config(format!("unknown part name in edge: {dst}")))?;
            if !seen.insert((src_ind, dst_ind)) {
                return Err(PafGroupError::Config(format!("duplicate edge: ({src}, {dst})")));
            }
            edge_inds.push((src_ind, dst_ind));
        }
        self.edge_inds = edge_inds;
        Ok(())
    }
}
