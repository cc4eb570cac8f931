// core/vehicle.rs

// Kinematic and power state of the rover, plus the short-lived task animation and
// the bounded trail of past positions the renderer draws behind it. The
// simulation core is the only writer; renderers receive clones in snapshots.

// Dependencies
use std::collections::VecDeque;

use super::geometry::{normalize_angle, Vec2};
use crate::config::VehicleConfig;

/// One breadcrumb of the rover trail
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackPoint {
    pub position: Vec2,
    pub timestamp: f64, // simulation seconds
}

/// Task being performed at a waypoint
#[derive(Clone, Debug, PartialEq)]
pub struct TaskAnimation {
    pub task_name: String,
    pub started_at: f64, // simulation seconds
    pub duration: f64,   // seconds
}

impl TaskAnimation {
    /// Fraction of the task completed at `now`, in [0, 1]
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }
}

/// Rover state
#[derive(Clone, Debug)]
pub struct VehicleState {
    pub position: Vec2,
    heading: f64,                 // radians, always in (-PI, PI]
    pub speed: f64,               // units/s, 0..=max_speed
    pub target_speed: f64,
    pub battery: f64,             // percent, 0..=100
    pub power_consumption_watts: f64,
    pub current_task: Option<TaskAnimation>,
    track_history: VecDeque<TrackPoint>,
    track_limit: usize,
}

impl VehicleState {
    /// Parks a fresh rover at `position` facing +x
    pub fn new(position: Vec2, config: &VehicleConfig) -> Self {
        VehicleState {
            position,
            heading: 0.0,
            speed: 0.0,
            target_speed: 0.0,
            battery: config.initial_battery.clamp(0.0, 100.0),
            power_consumption_watts: 0.0,
            current_task: None,
            track_history: VecDeque::with_capacity(config.track_history_limit),
            track_limit: config.track_history_limit,
        }
    }

    /// Current heading in (-PI, PI]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Sets the heading, wrapping it into (-PI, PI]
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = normalize_angle(heading);
    }

    /// Appends a trail point, dropping the oldest once the limit is hit
    pub fn record_track(&mut self, position: Vec2, timestamp: f64) {
        if self.track_limit == 0 {
            return;
        }
        if self.track_history.len() >= self.track_limit {
            self.track_history.pop_front();
        }
        self.track_history.push_back(TrackPoint { position, timestamp });
    }

    /// Trail, oldest first
    pub fn track_history(&self) -> &VecDeque<TrackPoint> {
        &self.track_history
    }

    pub fn clear_track(&mut self) {
        self.track_history.clear();
    }

    /// Zeroes speed and speed target
    pub fn halt(&mut self) {
        self.speed = 0.0;
        self.target_speed = 0.0;
    }

    /// Slows toward standstill at `deceleration` units/s^2
    pub fn coast(&mut self, deceleration: f64, dt: f64) {
        if self.speed > 0.0 {
            self.speed = (self.speed - deceleration * dt).max(0.0);
        }
    }

    /// Moves the rover to `position` without leaving a trail
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
    }
}
