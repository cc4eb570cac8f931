//! Mission bookkeeping
//!
//! Waypoints copied out of a profile, progress through them, distance and error
//! accounting, and the derived figures the dashboard shows (progress, ETA,
//! current task). Phase changes themselves live in [`crate::core::state`].

pub mod catalog;
pub mod scoring;

pub use catalog::{MissionCatalog, MissionProfile, ProfileInfo, WaypointTemplate};
pub use scoring::{efficiency_score, format_hms, MissionReport};

use crate::core::geometry::{distance, Vec2};
use crate::core::state::MissionPhase;

/// Waypoint of the running mission
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    /// Target location
    pub position: Vec2,
    /// Task performed on arrival
    pub task: String,
    /// Dwell time in seconds
    pub dwell_duration: f64,
    /// Set when the rover arrives
    pub completed: bool,
    /// Simulation time of arrival
    pub task_start_time: Option<f64>,
}

impl From<&WaypointTemplate> for Waypoint {
    fn from(template: &WaypointTemplate) -> Self {
        Waypoint {
            position: Vec2::new(template.x, template.y),
            task: template.task.clone(),
            dwell_duration: template.duration,
            completed: false,
            task_start_time: None,
        }
    }
}

/// Mutable mission progress
#[derive(Clone, Debug, Default)]
pub struct MissionState {
    /// Catalog key of the loaded profile
    pub active_profile: Option<String>,
    /// Per-mission copy of the profile's waypoints
    pub waypoints: Vec<Waypoint>,
    /// Index of the waypoint being sought
    pub current_waypoint: usize,
    /// Explicit phase
    pub phase: MissionPhase,
    /// Simulation time the mission started
    pub start_time: Option<f64>,
    /// Distance driven this mission
    pub total_distance: f64,
    /// Last computed efficiency, 0..=100
    pub efficiency: u32,
    /// Waypoints reached, the start position included
    pub completed_tasks: usize,
    /// Accumulated penalties; evasions add fractions
    pub error_count: f64,
    /// Live status line
    pub status_message: String,
    /// Low-battery warning already raised this mission
    pub low_battery_warned: bool,
}

impl MissionState {
    /// Fresh state holding copies of `profile`'s waypoints
    pub fn from_profile(key: &str, profile: &MissionProfile) -> Self {
        MissionState {
            active_profile: Some(key.to_string()),
            waypoints: profile.waypoints.iter().map(Waypoint::from).collect(),
            efficiency: 100,
            status_message: "Rover is idle.".to_string(),
            ..MissionState::default()
        }
    }

    /// Clears progress counters and waypoint completion for a new run
    pub fn begin(&mut self, now: f64) {
        self.start_time = Some(now);
        self.total_distance = 0.0;
        self.error_count = 0.0;
        self.efficiency = 100;
        self.low_battery_warned = false;
        for waypoint in self.waypoints.iter_mut() {
            waypoint.completed = false;
            waypoint.task_start_time = None;
        }
        // waypoint 0 is where the rover already stands
        if let Some(first) = self.waypoints.first_mut() {
            first.completed = true;
            first.task_start_time = Some(now);
        }
        self.completed_tasks = self.waypoints.len().min(1);
        self.current_waypoint = 1;
    }

    pub fn current_target(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current_waypoint)
    }

    /// Marks the current waypoint reached at `now`
    pub fn mark_reached(&mut self, now: f64) -> Option<&Waypoint> {
        let index = self.current_waypoint;
        let waypoint = self.waypoints.get_mut(index)?;
        if !waypoint.completed {
            waypoint.completed = true;
            waypoint.task_start_time = Some(now);
            self.completed_tasks = (self.completed_tasks + 1).min(self.waypoints.len());
        }
        self.waypoints.get(index)
    }

    /// Every waypoint has been visited
    pub fn all_visited(&self) -> bool {
        self.current_waypoint >= self.waypoints.len()
    }

    /// Mission time so far
    pub fn elapsed(&self, now: f64) -> f64 {
        self.start_time.map(|start| (now - start).max(0.0)).unwrap_or(0.0)
    }

    /// Share of waypoints reached, 0..=100
    pub fn progress_percent(&self) -> f64 {
        self.completed_tasks as f64 / self.waypoints.len().max(1) as f64 * 100.0
    }

    /// Polyline length from `from` through the remaining waypoints
    pub fn remaining_distance(&self, from: &Vec2) -> f64 {
        let mut last = *from;
        let mut total = 0.0;
        for waypoint in self.waypoints.iter().skip(self.current_waypoint) {
            total += distance(&last, &waypoint.position);
            last = waypoint.position;
        }
        total
    }

    /// Estimated seconds to finish, only while actively driving
    pub fn eta_seconds(&self, from: &Vec2, speed: f64) -> Option<f64> {
        if !self.phase.is_active() || speed <= 0.0 {
            return None;
        }
        Some(self.remaining_distance(from) / speed.max(0.1))
    }

    /// Task label of the current target, or "Mission Complete"
    pub fn current_task_label(&self) -> &str {
        self.current_target()
            .map(|w| w.task.as_str())
            .unwrap_or("Mission Complete")
    }
}
