//! Concentrator count estimation.
//!
//! Sizes the concentrator set so the expected relays per concentrator land
//! inside the configured load band. This is an estimate: the assigner's
//! actual loads depend on geography.

use log::debug;

use super::ClusteringError;
use crate::config::ClusteringConfig;

/// Estimates how many concentrators `total_points` points need.
///
/// `reserve` points are subtracted first to account for the points that will
/// become concentrators themselves. The count is derived from `target_load`
/// and corrected once toward `max_load` or `min_load` if the resulting
/// average falls outside the band.
///
/// # Examples
/// ```
/// use lightmesh::config::ClusteringConfig;
/// use lightmesh::topology::estimate_concentrator_count;
///
/// let config = ClusteringConfig::default();
/// assert_eq!(estimate_concentrator_count(500, &config).unwrap(), 2);
/// assert_eq!(estimate_concentrator_count(5_000, &config).unwrap(), 11);
/// assert!(estimate_concentrator_count(5, &config).is_err());
/// ```
pub fn estimate_concentrator_count(
    total_points: usize,
    config: &ClusteringConfig,
) -> Result<usize, ClusteringError> {
    if total_points < config.minimum_viable_point_count {
        return Err(ClusteringError::TooFewPoints {
            found: total_points,
            minimum: config.minimum_viable_point_count,
        });
    }

    if config.min_load == 0 || config.target_load == 0 || config.max_load == 0 {
        return Err(ClusteringError::ZeroLoad {
            min: config.min_load,
            target: config.target_load,
            max: config.max_load,
        });
    }

    let available = total_points.saturating_sub(config.reserve);
    let mut count = available.div_ceil(config.target_load);
    if count == 0 {
        return Ok(1);
    }

    let average = available as f64 / count as f64;
    if average > config.max_load as f64 {
        count = available.div_ceil(config.max_load);
    } else if average < config.min_load as f64 {
        count = available.div_ceil(config.min_load);
    }

    debug!(
        "Estimated {} concentrators for {} points ({} available, ~{:.1} relays each)",
        count,
        total_points,
        available,
        available as f64 / count.max(1) as f64
    );

    Ok(count.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_fixture() {
        // available = 480, ceil(480/475) = 2, average 240 < 450,
        // ceil(480/450) = 2
        let config = ClusteringConfig::default();
        assert_eq!(estimate_concentrator_count(500, &config).unwrap(), 2);
    }

    #[test]
    fn test_average_inside_band() {
        let config = ClusteringConfig::default();
        // available = 4750, exactly 10 * 475
        assert_eq!(estimate_concentrator_count(4_770, &config).unwrap(), 10);
    }

    #[test]
    fn test_correction_toward_min_load() {
        let config = ClusteringConfig::default();
        // available = 980, ceil(980/475) = 3, average 326.7 < 450,
        // ceil(980/450) = 3
        assert_eq!(estimate_concentrator_count(1_000, &config).unwrap(), 3);
    }

    #[test]
    fn test_correction_toward_max_load() {
        let config = ClusteringConfig {
            min_load: 100,
            target_load: 1_000,
            max_load: 500,
            ..Default::default()
        };
        // available = 2000, ceil(2000/1000) = 2, average 1000 > 500,
        // ceil(2000/500) = 4
        assert_eq!(estimate_concentrator_count(2_020, &config).unwrap(), 4);
    }

    #[test]
    fn test_below_minimum_is_configuration_error() {
        let config = ClusteringConfig::default();
        let err = estimate_concentrator_count(9, &config).unwrap_err();
        assert!(matches!(err, ClusteringError::TooFewPoints { found: 9, minimum: 10 }));
    }

    #[test]
    fn test_zero_loads_rejected() {
        for (min_load, target_load, max_load) in [(0, 475, 500), (450, 0, 500), (450, 475, 0)] {
            let config = ClusteringConfig {
                min_load,
                target_load,
                max_load,
                ..Default::default()
            };
            let err = estimate_concentrator_count(1_000, &config).unwrap_err();
            assert!(matches!(err, ClusteringError::ZeroLoad { .. }));
        }
    }

    #[test]
    fn test_fewer_points_than_reserve() {
        let config = ClusteringConfig::default();
        assert_eq!(estimate_concentrator_count(15, &config).unwrap(), 1);
    }
}
