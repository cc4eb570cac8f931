//! Rover mission simulator
//!
//! This library simulates an autonomous ground vehicle executing waypoint
//! missions in a 2D plane: seek steering with bounded turn rate and
//! acceleration, reactive obstacle and boundary avoidance, task dwell at each
//! waypoint, battery drain, and post-mission efficiency scoring. Rendering and
//! dashboards are external; they read [`FrameSnapshot`]s and receive
//! [`TelemetrySample`]s.

#![warn(unused_extern_crates)]

pub mod config;
pub mod core;
pub mod error;
pub mod mission;
pub mod navigation;
pub mod simulation;
pub mod telemetry;

// Re-export commonly used items for easier access
pub use config::{SimConfig, Viewport};
pub use crate::core::{MissionPhase, VehicleState};
pub use error::{ConfigError, SimResult, SimulationError};
pub use mission::{MissionCatalog, MissionProfile, MissionReport, MissionState, Waypoint};
pub use navigation::{MotionController, Obstacle, ObstacleField};
pub use simulation::{FrameDriver, FrameSnapshot, MissionEvent, Renderer, SimulationCore};
pub use telemetry::{ChartType, TelemetrySample, TelemetrySink};
