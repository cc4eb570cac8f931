// src/navigation/controller.rs
// Seek controller: turns the rover toward the target waypoint at a bounded rate,
// ramps the speed target down inside twice the arrival radius, and applies
// separate acceleration and deceleration limits. Produces the proposed next
// position; committing it is the caller's job once avoidance has approved it.

use crate::config::VehicleConfig;
use crate::core::geometry::{distance, heading_to, project, steer_toward, Vec2};
use crate::core::vehicle::VehicleState;

/// Result of one seek step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    /// Proposed position after integrating this frame
    pub proposed: Vec2,
    /// Distance covered by the proposal
    pub step_length: f64,
    /// Distance to the target before moving
    pub distance_to_target: f64,
}

/// Heading and speed controller
#[derive(Debug, Clone)]
pub struct MotionController {
    config: VehicleConfig,
}

impl MotionController {
    pub fn new(config: &VehicleConfig) -> Self {
        MotionController { config: config.clone() }
    }

    /// Cruise speed scaled down linearly within twice the arrival radius
    pub fn target_speed(&self, distance_to_target: f64) -> f64 {
        let ramp = distance_to_target / (self.config.arrival_threshold * 2.0);
        self.config.cruise_speed * ramp.clamp(0.0, 1.0)
    }

    /// Moves `current` toward `target` within the accel/decel limits, clamped to [0, max_speed]
    pub fn apply_motion_profile(&self, current: f64, target: f64, dt: f64) -> f64 {
        let diff = target - current;
        let rate = if diff > 0.0 {
            self.config.acceleration
        } else {
            self.config.deceleration
        };
        let next = current + diff.signum() * diff.abs().min(rate * dt);
        next.clamp(0.0, self.config.max_speed)
    }

    /// True once the rover is inside the arrival radius of `target`
    pub fn has_arrived(&self, position: &Vec2, target: &Vec2) -> bool {
        distance(position, target) < self.config.arrival_threshold
    }

    /// Updates heading, speed target and speed of `vehicle` for one frame of
    /// seeking `target`, and returns where it would end up
    pub fn seek(&self, vehicle: &mut VehicleState, target: &Vec2, dt: f64) -> MotionCommand {
        let distance_to_target = distance(&vehicle.position, target);

        let desired = heading_to(&vehicle.position, target);
        let heading = steer_toward(vehicle.heading(), desired, self.config.turning_rate * dt);
        vehicle.set_heading(heading);

        vehicle.target_speed = self.target_speed(distance_to_target);
        vehicle.speed = self.apply_motion_profile(vehicle.speed, vehicle.target_speed, dt);
        // floor keeps the rover creeping forward near the ramp's end
        if vehicle.speed < self.config.min_moving_speed {
            vehicle.speed = self.config.min_moving_speed;
        }

        let step_length = vehicle.speed * dt;
        MotionCommand {
            proposed: project(&vehicle.position, vehicle.heading(), step_length),
            step_length,
            distance_to_target,
        }
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }
}
