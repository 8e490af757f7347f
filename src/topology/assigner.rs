//! Relay assignment and capacity rebalancing.
//!
//! Assignment runs in two phases over an explicit [`Assignment`] value:
//!
//! - **Nearest** ([`assign_nearest`]): every non-concentrator point goes to
//!   its closest concentrator. Points are independent, so the search runs on
//!   the rayon pool and is collected back in input order.
//! - **Rebalance** ([`rebalance`]): relays of each concentrator are ordered by
//!   distance, the excess beyond `max_capacity` is moved to an overflow pool,
//!   and pooled relays are handed to the closest concentrator that still has
//!   room. This phase is sequential: every reassignment changes the remaining
//!   capacity seen by the next one.
//!
//! A relay that finds no concentrator with room is handled according to the
//! configured [`OverflowPolicy`].

use log::{debug, info, warn};
use rayon::prelude::*;

use super::types::{Cluster, Point, Topology};
use super::ClusteringError;
use crate::config::{ClusteringConfig, OverflowPolicy};

/// A relay held by a concentrator, with its distance to that concentrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignedRelay {
    /// Index into the point slice
    pub point: usize,
    pub distance_km: f64,
}

/// Relay lists indexed by concentrator position in the selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// Concentrator point indices, in selection order
    pub concentrators: Vec<usize>,
    /// `relays[i]` belongs to `concentrators[i]`
    pub relays: Vec<Vec<AssignedRelay>>,
}

impl Assignment {
    /// Number of relays per concentrator, in selection order
    pub fn loads(&self) -> Vec<usize> {
        self.relays.iter().map(Vec::len).collect()
    }

    /// Freezes the assignment into a topology, dropping relay distances.
    pub fn into_topology(self, points: &[Point]) -> Topology {
        let concentrators = self
            .concentrators
            .iter()
            .zip(self.relays)
            .map(|(&hub, relays)| Cluster {
                id: points[hub].id,
                point: points[hub].clone(),
                relays: relays.iter().map(|r| points[r.point].clone()).collect(),
            })
            .collect();

        Topology { concentrators }
    }
}

/// Outcome of the rebalancing phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentReport {
    /// Relays moved out of over-capacity concentrators
    pub overflowed: usize,
    /// Overflow relays placed on another concentrator
    pub reassigned: usize,
    /// Ids of relays left out of the topology (`drop` policy)
    pub dropped: Vec<i64>,
    /// Ids of relays kept beyond capacity (`exceed` policy)
    pub exceeded: Vec<i64>,
}

/// Assigns every non-concentrator point to its nearest concentrator.
///
/// Ties go to the concentrator selected first. Relays appear in each list in
/// input order.
///
/// # Errors
///
/// * `ClusteringError::NoConcentrators` if `concentrators` is empty
/// * `ClusteringError::DuplicateConcentrator` if a point is selected twice
/// * `ClusteringError::ConcentratorOutOfRange` if an index is past `points`
pub fn assign_nearest(points: &[Point], concentrators: &[usize]) -> Result<Assignment, ClusteringError> {
    if concentrators.is_empty() {
        return Err(ClusteringError::NoConcentrators);
    }

    let mut is_hub = vec![false; points.len()];
    for &hub in concentrators {
        if hub >= points.len() {
            return Err(ClusteringError::ConcentratorOutOfRange {
                index: hub,
                points: points.len(),
            });
        }
        if is_hub[hub] {
            return Err(ClusteringError::DuplicateConcentrator(points[hub].id));
        }
        is_hub[hub] = true;
    }

    let nearest: Vec<(usize, usize, f64)> = points
        .par_iter()
        .enumerate()
        .filter(|(idx, _)| !is_hub[*idx])
        .map(|(idx, point)| {
            let (slot, distance_km) = nearest_concentrator(points, concentrators, point, |_| true)
                .unwrap_or((0, f64::INFINITY));
            (idx, slot, distance_km)
        })
        .collect();

    let mut relays = vec![Vec::new(); concentrators.len()];
    for (point, slot, distance_km) in nearest {
        relays[slot].push(AssignedRelay { point, distance_km });
    }

    debug!("Nearest-concentrator loads: {:?}", relays.iter().map(Vec::len).collect::<Vec<_>>());

    Ok(Assignment {
        concentrators: concentrators.to_vec(),
        relays,
    })
}

/// Enforces `max_capacity` on every concentrator.
///
/// Each relay list is stably sorted by ascending distance. Relays past
/// `max_capacity` go to an overflow pool; pools are drained in concentrator
/// order, each relay going to the closest concentrator currently below
/// capacity. Reassigned relays are appended after the retained ones.
///
/// # Errors
///
/// * `ClusteringError::CapacityExhausted` under [`OverflowPolicy::Fail`]
///   when an overflow relay has nowhere to go
pub fn rebalance(
    points: &[Point],
    mut assignment: Assignment,
    max_capacity: usize,
    policy: OverflowPolicy,
) -> Result<(Assignment, AssignmentReport), ClusteringError> {
    let mut report = AssignmentReport::default();
    let mut pools: Vec<(usize, Vec<AssignedRelay>)> = Vec::new();

    for (slot, relays) in assignment.relays.iter_mut().enumerate() {
        relays.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        if relays.len() > max_capacity {
            let excess = relays.split_off(max_capacity);
            debug!(
                "Concentrator {} over capacity by {} relays",
                points[assignment.concentrators[slot]].id,
                excess.len()
            );
            report.overflowed += excess.len();
            pools.push((slot, excess));
        }
    }

    for (source, pool) in pools {
        for relay in pool {
            let point = &points[relay.point];
            let relays = &assignment.relays;
            let target = nearest_concentrator(points, &assignment.concentrators, point, |slot| {
                relays[slot].len() < max_capacity
            });

            match target {
                Some((slot, distance_km)) => {
                    assignment.relays[slot].push(AssignedRelay {
                        point: relay.point,
                        distance_km,
                    });
                    report.reassigned += 1;
                }
                None => match policy {
                    OverflowPolicy::Drop => report.dropped.push(point.id),
                    OverflowPolicy::Fail => {
                        return Err(ClusteringError::CapacityExhausted { relay_id: point.id })
                    }
                    OverflowPolicy::Exceed => {
                        assignment.relays[source].push(relay);
                        report.exceeded.push(point.id);
                    }
                },
            }
        }
    }

    if report.overflowed > 0 {
        info!(
            "Rebalanced {} overflow relays: {} reassigned, {} dropped, {} over capacity",
            report.overflowed,
            report.reassigned,
            report.dropped.len(),
            report.exceeded.len()
        );
    }
    if !report.dropped.is_empty() {
        warn!(
            "{} relays dropped: no concentrator had spare capacity (max_capacity = {})",
            report.dropped.len(),
            max_capacity
        );
    }

    Ok((assignment, report))
}

/// Runs both assignment phases and freezes the result.
pub fn assign_relays(
    points: &[Point],
    concentrators: &[usize],
    config: &ClusteringConfig,
) -> Result<(Topology, AssignmentReport), ClusteringError> {
    let assignment = assign_nearest(points, concentrators)?;
    let (assignment, report) = rebalance(points, assignment, config.max_capacity, config.overflow_policy)?;
    Ok((assignment.into_topology(points), report))
}

/// Closest concentrator slot accepted by `eligible`, first one on ties.
fn nearest_concentrator<F>(
    points: &[Point],
    concentrators: &[usize],
    point: &Point,
    eligible: F,
) -> Option<(usize, f64)>
where
    F: Fn(usize) -> bool,
{
    concentrators
        .iter()
        .enumerate()
        .filter(|(slot, _)| eligible(*slot))
        .map(|(slot, &hub)| (slot, points[hub].distance_km(point)))
        .fold(None, |best, (slot, dist)| match best {
            Some((_, best_dist)) if dist >= best_dist => best,
            _ => Some((slot, dist)),
        })
}
