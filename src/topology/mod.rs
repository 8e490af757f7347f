//! Concentrator/relay clustering.
//!
//! This module contains the clustering core: estimating how many
//! concentrators a point set needs, selecting well-spread concentrators, and
//! assigning every other point to one of them under a hard capacity.

pub mod types;
pub mod estimator;
pub mod selector;
pub mod assigner;
pub mod stats;

// Re-export key types and functions for easier access
pub use types::{Cluster, Point, Topology};
pub use estimator::estimate_concentrator_count;
pub use selector::select_concentrators;
pub use assigner::{assign_nearest, assign_relays, rebalance, AssignedRelay, Assignment, AssignmentReport};
pub use stats::TopologyStats;

/// Errors raised by the clustering pipeline
#[derive(Debug, thiserror::Error)]
pub enum ClusteringError {
    #[error("Need at least {minimum} points to build a topology, found {found}")]
    TooFewPoints { found: usize, minimum: usize },

    #[error("No points to cluster")]
    NoPoints,

    #[error("Concentrator count must be at least 1, got {0}")]
    InvalidConcentratorCount(usize),

    #[error("Load parameters must be non-zero (min {min}, target {target}, max {max})")]
    ZeroLoad { min: usize, target: usize, max: usize },

    #[error("Concentrator index {index} out of range for {points} points")]
    ConcentratorOutOfRange { index: usize, points: usize },

    #[error("No concentrators selected")]
    NoConcentrators,

    #[error("Point {0} selected as concentrator more than once")]
    DuplicateConcentrator(i64),

    #[error("No concentrator has spare capacity for relay {relay_id}")]
    CapacityExhausted { relay_id: i64 },
}
