//! Load statistics over a finished topology.

use serde::Serialize;

use super::types::Topology;

/// Relay counts and load spread of a topology
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyStats {
    pub total_points: usize,
    pub concentrators: usize,
    pub relays: usize,
    /// Points that are neither concentrators nor relays
    pub unassigned: usize,
    pub min_load: usize,
    pub max_load: usize,
    pub mean_load: f64,
    /// `(concentrator id, relay count)` in selection order
    pub distribution: Vec<(i64, usize)>,
}

impl TopologyStats {
    pub fn from_topology(topology: &Topology, total_points: usize) -> Self {
        let distribution: Vec<(i64, usize)> = topology
            .concentrators
            .iter()
            .map(|c| (c.id, c.relays.len()))
            .collect();

        let concentrators = distribution.len();
        let relays: usize = distribution.iter().map(|(_, n)| n).sum();
        let min_load = distribution.iter().map(|(_, n)| *n).min().unwrap_or(0);
        let max_load = distribution.iter().map(|(_, n)| *n).max().unwrap_or(0);
        let mean_load = if concentrators == 0 {
            0.0
        } else {
            relays as f64 / concentrators as f64
        };

        Self {
            total_points,
            concentrators,
            relays,
            unassigned: total_points.saturating_sub(concentrators + relays),
            min_load,
            max_load,
            mean_load,
            distribution,
        }
    }

    /// Concentrators whose relay count falls outside `[min, max]`
    pub fn outside_band(&self, min: usize, max: usize) -> Vec<(i64, usize)> {
        self.distribution
            .iter()
            .filter(|(_, n)| *n < min || *n > max)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::{Cluster, Point};

    fn point(id: i64) -> Point {
        Point {
            id,
            latitude: 0.0,
            longitude: 0.0,
            kind: "LED".to_string(),
            power: 80,
            area: "Urbano".to_string(),
        }
    }

    fn cluster(id: i64, relays: usize) -> Cluster {
        Cluster {
            id,
            point: point(id),
            relays: (0..relays).map(|i| point(id * 100 + i as i64)).collect(),
        }
    }

    #[test]
    fn test_stats() {
        let topology = Topology {
            concentrators: vec![cluster(1, 4), cluster(2, 2), cluster(3, 0)],
        };
        let stats = TopologyStats::from_topology(&topology, 12);
        assert_eq!(stats.concentrators, 3);
        assert_eq!(stats.relays, 6);
        assert_eq!(stats.unassigned, 3);
        assert_eq!(stats.min_load, 0);
        assert_eq!(stats.max_load, 4);
        assert!((stats.mean_load - 2.0).abs() < f64::EPSILON);
        assert_eq!(stats.distribution, vec![(1, 4), (2, 2), (3, 0)]);
        assert_eq!(stats.outside_band(1, 3), vec![(1, 4), (3, 0)]);
    }

    #[test]
    fn test_empty_topology() {
        let stats = TopologyStats::from_topology(&Topology::default(), 0);
        assert_eq!(stats.concentrators, 0);
        assert_eq!(stats.mean_load, 0.0);
    }
}
