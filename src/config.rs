use serde::{Deserialize, Serialize};

/// What to do with an overflow relay when no concentrator has spare capacity
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Leave the relay out of the topology and record it in the report
    #[default]
    Drop,
    /// Abort the run with a capacity error
    Fail,
    /// Keep the relay on its nearest concentrator beyond capacity
    Exceed,
}

/// Clustering parameters.
///
/// Every field has a default, so an empty YAML document (or no file at all)
/// yields the standard 450-500 relays per concentrator band.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Lower bound of the per-concentrator load band
    pub min_load: usize,
    /// Upper bound of the per-concentrator load band
    pub max_load: usize,
    /// Load the estimator aims for first
    pub target_load: usize,
    /// Points set aside for the concentrators themselves when estimating
    pub reserve: usize,
    /// Hard cap on relays per concentrator
    pub max_capacity: usize,
    /// Explicit concentrator count, bypassing the estimator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentrator_count: Option<usize>,
    /// Smallest point set worth clustering
    pub minimum_viable_point_count: usize,
    pub overflow_policy: OverflowPolicy,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_load: 450,
            max_load: 500,
            target_load: 475,
            reserve: 20,
            max_capacity: 500,
            concentrator_count: None,
            minimum_viable_point_count: 10,
            overflow_policy: OverflowPolicy::Drop,
        }
    }
}

impl ClusteringConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_load == 0 {
            return Err(ValidationError::InvalidLoadBand(
                "min_load must be greater than zero".to_string(),
            ));
        }
        if self.min_load > self.max_load {
            return Err(ValidationError::InvalidLoadBand(format!(
                "min_load ({}) cannot exceed max_load ({})",
                self.min_load, self.max_load
            )));
        }
        // target_load may sit outside the band; the estimator pulls the count back into it
        if self.target_load == 0 {
            return Err(ValidationError::InvalidLoadBand(
                "target_load must be greater than zero".to_string(),
            ));
        }

        if self.max_capacity == 0 {
            return Err(ValidationError::InvalidCapacity(
                "max_capacity must be greater than zero".to_string(),
            ));
        }

        if self.concentrator_count == Some(0) {
            return Err(ValidationError::InvalidConcentratorCount(
                "concentrator_count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid load band: {0}")]
    InvalidLoadBand(String),
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),
    #[error("Invalid concentrator count: {0}")]
    InvalidConcentratorCount(String),
}
