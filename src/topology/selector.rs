//! Concentrator selection.
//!
//! Greedy farthest-point (max-min) selection seeded at the point nearest the
//! geographic centroid. Each new concentrator is the unselected point whose
//! distance to the closest already-selected concentrator is largest, which
//! spreads concentrators evenly without iterating to a k-means fixpoint.
//!
//! Ties are always resolved in favour of the point that comes first in the
//! input, so the selection is a pure function of the ordered input.

use log::{debug, info, warn};
use rayon::prelude::*;

use super::types::Point;
use super::ClusteringError;
use crate::geo::{centroid, haversine_km};

/// Selects up to `count` concentrators from `points`.
///
/// Returns indices into `points`, in selection order. Fewer than `count`
/// indices are returned only when every point has been selected.
///
/// # Errors
///
/// * `ClusteringError::InvalidConcentratorCount` if `count` is zero
/// * `ClusteringError::NoPoints` if `points` is empty
pub fn select_concentrators(points: &[Point], count: usize) -> Result<Vec<usize>, ClusteringError> {
    if count == 0 {
        return Err(ClusteringError::InvalidConcentratorCount(count));
    }
    let (center_lat, center_lon) =
        centroid(points.iter().map(Point::coords)).ok_or(ClusteringError::NoPoints)?;

    debug!("Geographic centre: {:.5}, {:.5}", center_lat, center_lon);

    let first = nearest_to(points, center_lat, center_lon).ok_or(ClusteringError::NoPoints)?;

    let mut selected = Vec::with_capacity(count.min(points.len()));
    let mut is_selected = vec![false; points.len()];
    // Distance from each point to its closest selected concentrator
    let mut min_distance = vec![f64::INFINITY; points.len()];

    mark_selected(points, first, &mut selected, &mut is_selected, &mut min_distance);

    while selected.len() < count {
        let next = min_distance
            .iter()
            .enumerate()
            .filter(|(idx, _)| !is_selected[*idx])
            .fold(None, |best: Option<(usize, f64)>, (idx, &dist)| match best {
                Some((_, best_dist)) if dist <= best_dist => best,
                _ => Some((idx, dist)),
            });

        let Some((next, spread)) = next else {
            warn!(
                "Only {} points available, selected {} of {} requested concentrators",
                points.len(),
                selected.len(),
                count
            );
            break;
        };

        debug!(
            "Concentrator {} -> point {} ({:.3} km from nearest concentrator)",
            selected.len() + 1,
            points[next].id,
            spread
        );
        mark_selected(points, next, &mut selected, &mut is_selected, &mut min_distance);
    }

    info!("Selected {} concentrators", selected.len());
    Ok(selected)
}

/// Index of the point closest to the given coordinate, first one on ties.
fn nearest_to(points: &[Point], lat: f64, lon: f64) -> Option<usize> {
    points
        .iter()
        .map(|p| haversine_km(lat, lon, p.latitude, p.longitude))
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, dist)| match best {
            Some((_, best_dist)) if dist >= best_dist => best,
            _ => Some((idx, dist)),
        })
        .map(|(idx, _)| idx)
}

fn mark_selected(
    points: &[Point],
    idx: usize,
    selected: &mut Vec<usize>,
    is_selected: &mut [bool],
    min_distance: &mut [f64],
) {
    selected.push(idx);
    is_selected[idx] = true;

    let hub = &points[idx];
    min_distance
        .par_iter_mut()
        .zip(points.par_iter())
        .for_each(|(current, point)| {
            let dist = hub.distance_km(point);
            if dist < *current {
                *current = dist;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn point(id: i64, latitude: f64, longitude: f64) -> Point {
        Point {
            id,
            latitude,
            longitude,
            kind: "LED".to_string(),
            power: 80,
            area: "Urbano".to_string(),
        }
    }

    fn line() -> Vec<Point> {
        (0..9).map(|i| point(100 + i, 0.0, i as f64 * 0.01)).collect()
    }

    #[test]
    fn test_first_is_nearest_to_centroid() {
        let points = line();
        let selected = select_concentrators(&points, 1).unwrap();
        assert_eq!(selected, vec![4]);
    }

    #[test]
    fn test_farthest_point_order() {
        let points = line();
        let selected = select_concentrators(&points, 3).unwrap();
        // Both ends are equally far from the middle; the first one wins
        assert_eq!(selected, vec![4, 0, 8]);
    }

    #[test]
    fn test_distinct_and_bounded() {
        let points = line();
        let selected = select_concentrators(&points, 5).unwrap();
        assert_eq!(selected.len(), 5);
        let ids: HashSet<_> = selected.iter().map(|&i| points[i].id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_stops_when_candidates_exhausted() {
        let points = line();
        let selected = select_concentrators(&points, 20).unwrap();
        assert_eq!(selected.len(), points.len());
        let unique: HashSet<_> = selected.iter().collect();
        assert_eq!(unique.len(), points.len());
    }

    #[test]
    fn test_coincident_points_tie_break_by_input_order() {
        let points = vec![
            point(1, 1.0, 1.0),
            point(2, 1.0, 1.0),
            point(3, 1.0, 1.0),
        ];
        let selected = select_concentrators(&points, 3).unwrap();
        assert_eq!(selected, vec![0, 1, 2]);
    }

    #[test]
    fn test_deterministic() {
        let points: Vec<_> = (0..50)
            .map(|i| point(i, ((i * 37) % 17) as f64 * 0.003, ((i * 11) % 23) as f64 * 0.002))
            .collect();
        let a = select_concentrators(&points, 7).unwrap();
        let b = select_concentrators(&points, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_count_rejected() {
        let points = line();
        assert!(matches!(
            select_concentrators(&points, 0),
            Err(ClusteringError::InvalidConcentratorCount(0))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(select_concentrators(&[], 3), Err(ClusteringError::NoPoints)));
    }
}
