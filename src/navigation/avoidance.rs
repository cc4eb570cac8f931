// src/navigation/avoidance.rs
// Local reactive avoidance against static circular obstacles and the edge of the
// drivable area. There is no lookahead: a blocked move is refused, the heading is
// kicked 45 degrees to a random side, and normal seeking takes over next frame.

use log::warn;
use rand::Rng;

use crate::config::{AvoidanceConfig, ObstacleSpec, Viewport};
use crate::core::geometry::{distance, normalize_angle, Vec2};
use crate::error::{SimResult, SimulationError};

/// Static circular obstacle
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Centre
    pub position: Vec2,
    /// Radius
    pub radius: f64,
    /// Category tag (boulder, pit, ...)
    pub kind: String,
}

impl From<&ObstacleSpec> for Obstacle {
    fn from(spec: &ObstacleSpec) -> Self {
        Obstacle {
            position: Vec2::new(spec.x, spec.y),
            radius: spec.radius,
            kind: spec.kind.clone(),
        }
    }
}

/// Obstacle set plus the rules for checking and evading
#[derive(Clone, Debug)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    vehicle_radius: f64,
    config: AvoidanceConfig,
}

impl ObstacleField {
    /// Builds the field from config specs
    pub fn new(obstacles: &[ObstacleSpec], vehicle_radius: f64, config: &AvoidanceConfig) -> Self {
        ObstacleField {
            obstacles: obstacles.iter().map(Obstacle::from).collect(),
            vehicle_radius,
            config: config.clone(),
        }
    }

    /// True iff `position` keeps more than `radius + vehicle_radius` from every obstacle centre
    pub fn is_path_clear(&self, position: &Vec2) -> bool {
        self.obstacles
            .iter()
            .all(|o| distance(position, &o.position) > o.radius + self.vehicle_radius)
    }

    /// True iff `position` lies at least `boundary_margin` inside the viewport
    pub fn within_bounds(&self, position: &Vec2, viewport: &Viewport) -> bool {
        let margin = self.config.boundary_margin;
        position.x >= margin
            && position.x <= viewport.width - margin
            && position.y >= margin
            && position.y <= viewport.height - margin
    }

    /// Boundary first, then obstacles
    pub fn check(&self, position: &Vec2, viewport: &Viewport) -> SimResult<()> {
        if !self.within_bounds(position, viewport) {
            return Err(SimulationError::BoundaryBlocked);
        }
        if !self.is_path_clear(position) {
            return Err(SimulationError::ObstacleBlocked);
        }
        Ok(())
    }

    /// New heading after a blocked move: +/- evasion angle, random side
    pub fn evade<R: Rng + ?Sized>(&self, heading: f64, rng: &mut R) -> f64 {
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let evaded = normalize_angle(heading + side * self.config.evasion_angle);
        warn!(
            "Path blocked, evading: heading {:.2} -> {:.2} rad",
            heading, evaded
        );
        evaded
    }

    /// Error-count penalty charged per evasion
    pub fn evasion_penalty(&self) -> f64 {
        self.config.evasion_penalty
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
