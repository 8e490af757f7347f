//! Topology validation utilities.
//!
//! Structural checks run after clustering and by `topology-info check`
//! against documents produced elsewhere.

use std::collections::{HashMap, HashSet};

use crate::topology::{Point, Topology};

/// Validate the structural invariants of a topology
///
/// Checks for:
/// - Ids appearing more than once across concentrators and relays
/// - Clusters whose `id` differs from their concentrator point's id
/// - Concentrators holding more than `max_capacity` relays (if given)
///
/// # Arguments
/// * `topology` - The topology to validate
/// * `max_capacity` - Optional relay cap per concentrator
///
/// # Returns
/// * `Ok(())` if validation succeeds
/// * `Err(String)` describing the first violation found
///
/// # Examples
/// ```
/// use lightmesh::topology::Topology;
/// use lightmesh::utils::validation::validate_topology;
///
/// assert!(validate_topology(&Topology::default(), Some(500)).is_ok());
/// ```
pub fn validate_topology(topology: &Topology, max_capacity: Option<usize>) -> Result<(), String> {
    let mut seen = HashSet::new();

    for cluster in &topology.concentrators {
        if cluster.id != cluster.point.id {
            return Err(format!(
                "Cluster id {} does not match its concentrator point id {}",
                cluster.id, cluster.point.id
            ));
        }

        if !seen.insert(cluster.id) {
            return Err(format!("Id {} appears more than once in the topology", cluster.id));
        }
        for relay in &cluster.relays {
            if !seen.insert(relay.id) {
                return Err(format!("Id {} appears more than once in the topology", relay.id));
            }
        }

        if let Some(cap) = max_capacity {
            if cluster.relays.len() > cap {
                return Err(format!(
                    "Concentrator {} holds {} relays, above the capacity of {}",
                    cluster.id,
                    cluster.relays.len(),
                    cap
                ));
            }
        }
    }

    Ok(())
}

/// Validate that every point in the topology comes unchanged from `points`
///
/// # Returns
/// * `Ok(())` if every concentrator and relay matches an input point exactly
/// * `Err(String)` naming the first unknown or altered point
pub fn validate_against_points(topology: &Topology, points: &[Point]) -> Result<(), String> {
    let by_id: HashMap<i64, &Point> = points.iter().map(|p| (p.id, p)).collect();

    for cluster in &topology.concentrators {
        for point in std::iter::once(&cluster.point).chain(cluster.relays.iter()) {
            match by_id.get(&point.id) {
                None => return Err(format!("Point {} is not part of the input", point.id)),
                Some(original) if *original != point => {
                    return Err(format!("Point {} differs from its input record", point.id))
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Cluster;

    fn point(id: i64) -> Point {
        Point {
            id,
            latitude: -8.0,
            longitude: -34.9,
            kind: "LED".to_string(),
            power: 80,
            area: "Urbano".to_string(),
        }
    }

    fn topology() -> Topology {
        Topology {
            concentrators: vec![
                Cluster { id: 1, point: point(1), relays: vec![point(3), point(4)] },
                Cluster { id: 2, point: point(2), relays: vec![point(5)] },
            ],
        }
    }

    #[test]
    fn test_valid_topology() {
        assert!(validate_topology(&topology(), Some(2)).is_ok());
        assert!(validate_topology(&topology(), None).is_ok());
    }

    #[test]
    fn test_capacity_violation() {
        let err = validate_topology(&topology(), Some(1)).unwrap_err();
        assert!(err.contains("Concentrator 1 holds 2 relays"));
    }

    #[test]
    fn test_duplicate_relay() {
        let mut t = topology();
        t.concentrators[1].relays.push(point(3));
        assert!(validate_topology(&t, None).is_err());
    }

    #[test]
    fn test_concentrator_listed_as_relay() {
        let mut t = topology();
        t.concentrators[1].relays.push(point(1));
        assert!(validate_topology(&t, None).is_err());
    }

    #[test]
    fn test_mismatched_cluster_id() {
        let mut t = topology();
        t.concentrators[0].id = 9;
        assert!(validate_topology(&t, None).is_err());
    }

    #[test]
    fn test_against_points() {
        let points: Vec<Point> = (1..=5).map(point).collect();
        assert!(validate_against_points(&topology(), &points).is_ok());

        assert!(validate_against_points(&topology(), &points[..4]).is_err());

        let mut altered = points.clone();
        altered[2].power = 250;
        let err = validate_against_points(&topology(), &altered).unwrap_err();
        assert!(err.contains("Point 3"));
    }
}
