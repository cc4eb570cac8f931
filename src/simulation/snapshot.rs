// simulation/snapshot.rs

// Read-only view of the simulation handed to renderers and dashboards once per
// frame, after the step has finished. Everything is owned, so a renderer can
// hold on to a snapshot without borrowing the core.

use crate::core::state::MissionPhase;
use crate::core::vehicle::{TaskAnimation, TrackPoint};
use crate::core::Vec2;
use crate::mission::Waypoint;
use crate::navigation::Obstacle;
use crate::telemetry::HealthStatus;

/// Rover as the renderer sees it
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleView {
    pub position: Vec2,
    pub heading: f64,
    pub speed: f64,
    pub battery: f64,
    pub power_watts: f64,
    pub track: Vec<TrackPoint>,
    pub task: Option<TaskAnimation>,
    pub task_progress: f64,
}

/// Derived figures for the mission status panel
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub status_label: &'static str,
    pub current_task: String,
    pub completed_tasks: usize,
    pub waypoint_count: usize,
    pub progress_percent: f64,
    pub eta: Option<String>, // HH:MM:SS
    pub elapsed: String,     // HH:MM:SS
    pub total_distance: f64,
    pub efficiency: u32,
    pub heading_degrees: f64,
    pub health_status: HealthStatus,
}

/// Everything a frame needs to draw
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub time: f64,
    pub vehicle: VehicleView,
    pub waypoints: Vec<Waypoint>,
    pub current_waypoint: usize,
    pub phase: MissionPhase,
    pub status_message: String,
    pub obstacles: Vec<Obstacle>,
    pub dashboard: DashboardView,
}

/// Presentation layer drawing one frame from a snapshot
pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot);
}
