// src/navigation/planner.rs
// Greedy nearest-neighbour reordering of mission waypoints. The first waypoint is
// the rover's start and never moves; the rest are visited closest-first.

use log::{debug, info};

use crate::core::geometry::{distance, Vec2};
use crate::mission::Waypoint;

/// Fewest waypoints for which reordering can change anything
pub const MIN_OPTIMIZABLE: usize = 3;

/// Visiting order for `points`, starting from index 0.
///
/// Ties go to the lowest remaining index.
pub fn nearest_neighbor_order(points: &[Vec2]) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut order = Vec::with_capacity(points.len());
    let mut unvisited: Vec<usize> = (1..points.len()).collect();
    let mut current = 0;
    order.push(current);

    while !unvisited.is_empty() {
        let mut nearest_slot = 0;
        let mut nearest_distance = f64::INFINITY;
        for (slot, &index) in unvisited.iter().enumerate() {
            let d = distance(&points[current], &points[index]);
            if d < nearest_distance {
                nearest_distance = d;
                nearest_slot = slot;
            }
        }
        current = unvisited.remove(nearest_slot);
        order.push(current);
    }
    order
}

/// Reorders waypoints in place; returns false when there were too few to matter
pub fn optimize_waypoints(waypoints: &mut Vec<Waypoint>) -> bool {
    if waypoints.len() < MIN_OPTIMIZABLE {
        debug!("Skipping path optimization for {} waypoints", waypoints.len());
        return false;
    }
    let points: Vec<Vec2> = waypoints.iter().map(|w| w.position).collect();
    let order = nearest_neighbor_order(&points);

    let mut slots: Vec<Option<Waypoint>> = waypoints.drain(..).map(Some).collect();
    waypoints.extend(order.into_iter().filter_map(|i| slots[i].take()));

    info!("Optimized path over {} waypoints", waypoints.len());
    true
}
