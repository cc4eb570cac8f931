// src/config.rs
// Tunable parameters for the rover simulator. Defaults reproduce the stock rover
// (4 m/s top speed, 25 m arrival radius, six-sensor payload) and the three
// obstacles of the demo terrain. Any section may be overridden from YAML.

use log::info;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Vehicle kinematics and mission preconditions
    pub vehicle: VehicleConfig,
    /// Battery drain and power display model
    pub power: PowerConfig,
    /// Obstacle and boundary handling
    pub avoidance: AvoidanceConfig,
    /// Frame pacing, time scaling and telemetry cadence
    pub simulation: SimulationSettings,
    /// Static obstacle field
    pub obstacles: Vec<ObstacleSpec>,
    /// Optional YAML mission catalog replacing the built-in profiles
    pub catalog_path: Option<PathBuf>,
}

/// Vehicle kinematic limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VehicleConfig {
    pub max_speed: f64,          // units/s
    pub cruise_speed: f64,       // units/s
    pub acceleration: f64,       // units/s^2
    pub deceleration: f64,       // units/s^2
    pub turning_rate: f64,       // rad/s
    pub arrival_threshold: f64,  // units
    pub vehicle_radius: f64,     // units
    pub min_moving_speed: f64,   // floor while seeking a waypoint
    pub track_history_limit: usize,
    pub initial_battery: f64,    // percent
    pub min_start_battery: f64,  // percent
}

/// Battery drain coefficients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerConfig {
    pub idle_rate: f64,          // %/s with everything parked
    pub movement_rate: f64,      // %/s at max speed
    pub sensor_rate_factor: f64, // %/s per active sensor watt
    pub base_watts: f64,
    pub range_watts: f64,
    pub sensors: Vec<SensorSpec>,
}

/// One payload sensor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorSpec {
    pub name: String,
    pub power_watts: f64,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Reactive avoidance parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AvoidanceConfig {
    pub boundary_margin: f64,
    pub evasion_angle: f64,      // rad
    pub evasion_penalty: f64,    // added to the mission error count
}

/// Clock, pacing and telemetry cadence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub target_fps: u32,
    pub max_frame_dt: f64,       // seconds
    pub dwell_time_scale: f64,   // multiplier applied to waypoint dwell durations
    pub telemetry_interval: f64, // seconds of simulation time
    pub health_interval: f64,    // seconds of simulation time
    pub telemetry_window: usize,
    pub viewport: Viewport,
    pub seed: Option<u64>,
    pub default_profile: String,
}

/// Drivable area supplied by the presentation layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Circular obstacle as written in config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleSpec {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub kind: String,
}

fn default_true() -> bool {
    true
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            vehicle: VehicleConfig::default(),
            power: PowerConfig::default(),
            avoidance: AvoidanceConfig::default(),
            simulation: SimulationSettings::default(),
            obstacles: vec![
                ObstacleSpec { x: 200.0, y: 150.0, radius: 20.0, kind: "boulder".to_string() },
                ObstacleSpec { x: 300.0, y: 120.0, radius: 15.0, kind: "pit".to_string() },
                ObstacleSpec { x: 180.0, y: 250.0, radius: 18.0, kind: "rock_formation".to_string() },
            ],
            catalog_path: None,
        }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        VehicleConfig {
            max_speed: 4.0,
            cruise_speed: 2.7,
            acceleration: 0.8,
            deceleration: 1.2,
            turning_rate: 2.0,
            arrival_threshold: 25.0,
            vehicle_radius: 20.0,
            min_moving_speed: 0.5,
            track_history_limit: 500,
            initial_battery: 100.0,
            min_start_battery: 20.0,
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        let sensor = |name: &str, power_watts: f64| SensorSpec {
            name: name.to_string(),
            power_watts,
            active: true,
        };
        PowerConfig {
            idle_rate: 0.001,
            movement_rate: 0.005,
            sensor_rate_factor: 0.0001,
            base_watts: 110.0,
            range_watts: 200.0,
            sensors: vec![
                sensor("nav_cameras", 8.0),
                sensor("hazard_cameras", 12.0),
                sensor("lidar", 85.0),
                sensor("radar", 35.0),
                sensor("imu", 3.0),
                sensor("gps", 6.0),
            ],
        }
    }
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        AvoidanceConfig {
            boundary_margin: 50.0,
            evasion_angle: FRAC_PI_4,
            evasion_penalty: 0.1,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            target_fps: 60,
            max_frame_dt: 1.0 / 30.0,
            dwell_time_scale: 1.0,
            telemetry_interval: 1.0,
            health_interval: 2.0,
            telemetry_window: 15,
            viewport: Viewport::default(),
            seed: None,
            default_profile: "geological".to_string(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 800.0, height: 600.0 }
    }
}

impl SimConfig {
    /// Loads and validates a YAML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: SimConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the step function cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vehicle;
        positive("vehicle.max_speed", v.max_speed)?;
        positive("vehicle.turning_rate", v.turning_rate)?;
        positive("vehicle.acceleration", v.acceleration)?;
        positive("vehicle.deceleration", v.deceleration)?;
        positive("vehicle.arrival_threshold", v.arrival_threshold)?;
        if v.cruise_speed <= 0.0 || v.cruise_speed > v.max_speed {
            return Err(ConfigError::Invalid {
                field: "vehicle.cruise_speed",
                reason: format!("must be in (0, max_speed], got {}", v.cruise_speed),
            });
        }
        if v.min_moving_speed < 0.0 || v.min_moving_speed > v.max_speed {
            return Err(ConfigError::Invalid {
                field: "vehicle.min_moving_speed",
                reason: format!("must be in [0, max_speed], got {}", v.min_moving_speed),
            });
        }
        if !(0.0..=100.0).contains(&v.initial_battery) {
            return Err(ConfigError::Invalid {
                field: "vehicle.initial_battery",
                reason: format!("must be a percentage, got {}", v.initial_battery),
            });
        }

        let s = &self.simulation;
        positive("simulation.max_frame_dt", s.max_frame_dt)?;
        positive("simulation.telemetry_interval", s.telemetry_interval)?;
        positive("simulation.health_interval", s.health_interval)?;
        positive("simulation.viewport.width", s.viewport.width)?;
        positive("simulation.viewport.height", s.viewport.height)?;
        if s.dwell_time_scale < 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.dwell_time_scale",
                reason: "must not be negative".to_string(),
            });
        }
        if s.target_fps == 0 || s.telemetry_window == 0 {
            return Err(ConfigError::Invalid {
                field: "simulation",
                reason: "target_fps and telemetry_window must be non-zero".to_string(),
            });
        }

        if let Some(o) = self.obstacles.iter().find(|o| o.radius < 0.0) {
            return Err(ConfigError::Invalid {
                field: "obstacles",
                reason: format!("negative radius for {}", o.kind),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {}", value),
        })
    }
}
