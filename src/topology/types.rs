//! Topology type definitions.
//!
//! Points are the immutable input records; a [`Topology`] is the frozen
//! result of clustering, one [`Cluster`] per concentrator in selection order.

use serde::{Deserialize, Serialize};

/// A geotagged lighting unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: String,
    /// Lamp power in watts
    pub power: i64,
    pub area: String,
}

impl Point {
    /// Haversine distance to another point, in kilometers
    pub fn distance_km(&self, other: &Point) -> f64 {
        crate::geo::haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// A concentrator and the relays it serves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Id of the concentrator point
    pub id: i64,
    pub point: Point,
    pub relays: Vec<Point>,
}

/// Final hub-and-spoke layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub concentrators: Vec<Cluster>,
}

impl Topology {
    /// Look up a cluster by concentrator id
    pub fn concentrator(&self, id: i64) -> Option<&Cluster> {
        self.concentrators.iter().find(|c| c.id == id)
    }

    /// Relays served by a concentrator; empty if the id is unknown
    pub fn relays_of(&self, concentrator_id: i64) -> &[Point] {
        self.concentrator(concentrator_id)
            .map(|c| c.relays.as_slice())
            .unwrap_or(&[])
    }

    /// Look up one relay of one concentrator
    pub fn relay(&self, concentrator_id: i64, relay_id: i64) -> Option<&Point> {
        self.relays_of(concentrator_id).iter().find(|r| r.id == relay_id)
    }

    pub fn concentrator_count(&self) -> usize {
        self.concentrators.len()
    }

    pub fn relay_count(&self) -> usize {
        self.concentrators.iter().map(|c| c.relays.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn sample() -> Topology {
        Topology {
            concentrators: vec![
                Cluster { id: 1, point: point(1), relays: vec![point(10), point(11)] },
                Cluster { id: 2, point: point(2), relays: vec![point(20)] },
            ],
        }
    }

    #[test]
    fn test_lookups() {
        let topology = sample();
        assert_eq!(topology.concentrator(2).map(|c| c.relays.len()), Some(1));
        assert!(topology.concentrator(3).is_none());
        assert_eq!(topology.relays_of(1).len(), 2);
        assert!(topology.relays_of(99).is_empty());
        assert_eq!(topology.relay(1, 11).map(|r| r.id), Some(11));
        assert!(topology.relay(2, 11).is_none());
        assert_eq!(topology.concentrator_count(), 2);
        assert_eq!(topology.relay_count(), 3);
    }

    #[test]
    fn test_point_serializes_type_field() {
        let json = serde_json::to_value(point(7)).unwrap();
        assert_eq!(json["type"], "LED");
        assert!(json.get("kind").is_none());
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 6);
    }
}
