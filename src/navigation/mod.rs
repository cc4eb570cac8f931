//! Navigation system for the rover
//!
//! This module handles waypoint seeking, reactive obstacle and boundary
//! avoidance, and nearest-neighbour path optimization.

pub mod avoidance;
pub mod controller;
pub mod planner;

pub use avoidance::{Obstacle, ObstacleField};
pub use controller::{MotionCommand, MotionController};
pub use planner::{nearest_neighbor_order, optimize_waypoints};
