pub mod assemble;
pub mod assignment;
pub mod bucket;
pub mod config;
pub mod consts;
pub mod edges;
pub mod error;
pub mod group;
pub mod paf;
pub mod partition;
pub mod sampler;
pub mod scorer;
pub mod types;

pub use assemble::PredictedInstances;
pub use config::{InstancePeakThreshold, PafScorerConfig};
pub use error::{PafGroupError, Result};
pub use group::{group, FlatPeaks};
pub use paf::PafField;
pub use partition::InstanceAssignment;
pub use types::{Connections, EdgeConnection, EdgeType, Peak, PeakId};
