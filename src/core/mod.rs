// core/mod.rs

// Vehicle-level building blocks: planar geometry, the rover's kinematic and power
// state, the battery model and the mission phase machine. Higher layers
// (navigation, mission, simulation) are written against these types.

pub mod geometry;
pub mod power;
pub mod state;
pub mod vehicle;

pub use geometry::{distance, heading_to, normalize_angle, shortest_turn, steer_toward, Vec2};
pub use power::PowerModel;
pub use state::{MissionPhase, PhaseEvent};
pub use vehicle::{TaskAnimation, TrackPoint, VehicleState};
