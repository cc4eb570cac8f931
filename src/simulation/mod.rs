//! Simulation core
//!
//! [`SimulationCore`] owns the rover, the mission, the obstacle field and the
//! telemetry buffers, and exposes the operator command surface (load, start,
//! pause, stop, emergency stop, clear, optimize, chart selection) plus the
//! per-frame [`SimulationCore::step`]. All time is simulation time in seconds,
//! advanced only by `step`, so a run is reproducible for a given seed and frame
//! sequence.

pub mod driver;
pub mod snapshot;

pub use driver::{FrameClock, FrameDriver};
pub use snapshot::{DashboardView, FrameSnapshot, Renderer, VehicleView};

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{SimConfig, Viewport};
use crate::core::geometry::heading_degrees;
use crate::core::state::{MissionPhase, PhaseEvent};
use crate::core::vehicle::{TaskAnimation, VehicleState};
use crate::core::{PowerModel, Vec2};
use crate::error::{ConfigError, SimResult, SimulationError};
use crate::mission::{
    efficiency_score, format_hms, MissionCatalog, MissionReport, MissionState, ProfileInfo,
};
use crate::navigation::{optimize_waypoints, MotionController, ObstacleField};
use crate::telemetry::{ChartType, Environment, SystemHealth, Telemetry, TelemetrySample};

/// Notable things that happened during a command or a step
#[derive(Clone, Debug, PartialEq)]
pub enum MissionEvent {
    /// Blocking operator alert
    Alert(String),
    /// Battery fell below the start threshold during a mission
    LowBattery { battery: f64 },
    /// Rover entered a waypoint's arrival radius
    WaypointReached { index: usize, task: String },
    /// Dwell at a waypoint finished
    TaskCompleted { index: usize, task: String },
    /// Last waypoint done
    MissionCompleted(MissionReport),
}

/// The whole simulation state and its command surface
pub struct SimulationCore {
    config: SimConfig,
    catalog: MissionCatalog,
    selected_profile: String,
    vehicle: VehicleState,
    mission: MissionState,
    obstacles: ObstacleField,
    controller: MotionController,
    power: PowerModel,
    telemetry: Telemetry,
    health: SystemHealth,
    environment: Environment,
    events: Vec<MissionEvent>,
    last_report: Option<MissionReport>,
    rng: StdRng,
    time: f64,
}

impl SimulationCore {
    /// Builds a core from config, reading the catalog file if one is configured
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let catalog = match &config.catalog_path {
            Some(path) => MissionCatalog::from_file(path)?,
            None => MissionCatalog::builtin(),
        };
        Self::with_catalog(config, catalog)
    }

    /// Builds a core with an explicit catalog and loads the default profile
    pub fn with_catalog(config: SimConfig, catalog: MissionCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        let default_profile = config.simulation.default_profile.clone();
        if catalog.get(&default_profile).is_err() {
            return Err(ConfigError::Invalid {
                field: "simulation.default_profile",
                reason: format!("profile {} is not in the catalog", default_profile),
            });
        }

        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut core = SimulationCore {
            vehicle: VehicleState::new(Vec2::zeros(), &config.vehicle),
            mission: MissionState::default(),
            obstacles: ObstacleField::new(
                &config.obstacles,
                config.vehicle.vehicle_radius,
                &config.avoidance,
            ),
            controller: MotionController::new(&config.vehicle),
            power: PowerModel::new(&config.power),
            telemetry: Telemetry::new(config.simulation.telemetry_window),
            health: SystemHealth::default(),
            environment: Environment::default(),
            events: Vec::new(),
            last_report: None,
            rng,
            time: 0.0,
            selected_profile: default_profile.clone(),
            catalog,
            config,
        };
        core.load_profile(&default_profile)
            .map_err(|e| ConfigError::Invalid {
                field: "simulation.default_profile",
                reason: e.to_string(),
            })?;
        info!("Simulation core ready with {} mission profiles", core.catalog.len());
        Ok(core)
    }

    // ----- command surface -----

    /// Replaces the mission with a fresh copy of profile `key` and parks the
    /// rover on its first waypoint
    pub fn load_profile(&mut self, key: &str) -> SimResult<()> {
        if self.mission.phase.is_active() {
            return Err(SimulationError::MissionActive);
        }
        let profile = match self.catalog.get(key) {
            Ok(profile) => profile,
            Err(e) => {
                error!("Profile {} not found", key);
                self.events.push(MissionEvent::Alert(e.to_string()));
                return Err(e);
            }
        };

        let mission = MissionState::from_profile(key, profile);
        if let Some(start) = mission.waypoints.first() {
            self.vehicle.teleport(start.position);
        }
        info!("Loaded mission profile: {} with {} waypoints", profile.name, mission.waypoints.len());

        self.mission = mission;
        self.selected_profile = key.to_string();
        self.vehicle.halt();
        self.vehicle.current_task = None;
        self.last_report = None;
        Ok(())
    }

    /// Starts the loaded mission
    pub fn start(&mut self) -> SimResult<()> {
        if self.mission.waypoints.is_empty() {
            return Err(self.alert(SimulationError::NoMission));
        }
        let battery = self.vehicle.battery;
        if battery < self.config.vehicle.min_start_battery {
            return Err(self.alert(SimulationError::InsufficientResources { battery }));
        }
        self.mission.phase = self.mission.phase.transition(PhaseEvent::Start, self.time)?;

        self.mission.begin(self.time);
        self.mission.status_message = "Mission started.".to_string();
        self.vehicle.clear_track();
        self.vehicle.speed = 0.0;
        self.vehicle.target_speed = self.config.vehicle.cruise_speed;
        self.vehicle.current_task = None;
        self.last_report = None;

        info!("Mission started with {} waypoints", self.mission.waypoints.len());
        Ok(())
    }

    /// Toggles pause; returns whether the mission is now paused
    pub fn pause(&mut self) -> SimResult<bool> {
        self.mission.phase = self
            .mission
            .phase
            .transition(PhaseEvent::TogglePause, self.time)?;
        let paused = self.mission.phase.is_paused();
        info!("Mission {}", if paused { "paused" } else { "resumed" });
        Ok(paused)
    }

    /// Halts the rover and ends the mission without scoring
    pub fn stop(&mut self) -> SimResult<()> {
        self.mission.phase = self.mission.phase.transition(PhaseEvent::Stop, self.time)?;
        self.vehicle.halt();
        self.vehicle.current_task = None;
        self.mission.status_message = "Mission stopped.".to_string();
        info!("Mission stopped");
        Ok(())
    }

    /// Stop plus an error penalty and a blocking alert.
    ///
    /// A completed mission keeps its score; only the halt and the alert apply.
    pub fn emergency_stop(&mut self) -> SimResult<()> {
        error!("EMERGENCY STOP ACTIVATED");
        let scored = self.mission.phase == MissionPhase::Completed;
        self.stop()?;
        if !scored {
            self.mission.error_count += 1.0;
        }
        self.events.push(MissionEvent::Alert(
            "Emergency stop activated. All rover systems halted.".to_string(),
        ));
        Ok(())
    }

    /// Stops and reloads the selected profile
    pub fn reset(&mut self) -> SimResult<()> {
        self.stop()?;
        self.mission.phase = self.mission.phase.transition(PhaseEvent::Reset, self.time)?;
        let key = self.selected_profile.clone();
        self.load_profile(&key)?;
        info!("Mission reset");
        Ok(())
    }

    /// Drops all waypoints; not available during a mission
    pub fn clear_waypoints(&mut self) -> SimResult<()> {
        if self.mission.phase.is_active() {
            return Err(SimulationError::MissionActive);
        }
        self.mission.waypoints.clear();
        self.mission.current_waypoint = 0;
        self.mission.completed_tasks = 0;
        self.mission.phase = self.mission.phase.transition(PhaseEvent::Reset, self.time)?;
        info!("Waypoints cleared");
        Ok(())
    }

    /// Nearest-neighbour reordering; returns false when fewer than three waypoints
    pub fn optimize_path(&mut self) -> SimResult<bool> {
        if self.mission.phase.is_active() {
            return Err(SimulationError::MissionActive);
        }
        Ok(optimize_waypoints(&mut self.mission.waypoints))
    }

    /// Switches a payload sensor on or off; returns false for an unknown name
    pub fn set_sensor_active(&mut self, name: &str, active: bool) -> bool {
        let found = self.power.set_sensor_active(name, active);
        if found {
            info!("Sensor {} {}", name, if active { "enabled" } else { "disabled" });
        } else {
            warn!("Unknown sensor {}", name);
        }
        found
    }

    /// Picks the chart shown on the dashboard
    pub fn select_chart(&mut self, key: &str) -> SimResult<ChartType> {
        self.telemetry.select(key)
    }

    /// Summary of a catalog profile
    pub fn profile_info(&self, key: &str) -> SimResult<ProfileInfo> {
        self.catalog.profile_info(key)
    }

    // ----- frame step -----

    /// Advances the simulation by `dt` seconds (clamped to the frame cap)
    /// inside the drivable `viewport`.
    ///
    /// Obstacle and boundary blocks are absorbed. A lost target or an empty
    /// battery stops the mission and is returned as the error.
    pub fn step(&mut self, dt: f64, viewport: &Viewport) -> SimResult<()> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.simulation.max_frame_dt)
        } else {
            0.0
        };
        self.time += dt;
        let now = self.time;

        match self.mission.phase {
            MissionPhase::Idle | MissionPhase::Paused { .. } | MissionPhase::Completed => {
                self.vehicle.coast(self.config.vehicle.deceleration, dt);
                self.mission.status_message = match self.mission.phase {
                    MissionPhase::Paused { .. } => "Mission paused.",
                    MissionPhase::Completed => "Mission complete.",
                    _ => "Mission idle.",
                }
                .to_string();
                Ok(())
            }
            MissionPhase::Dwelling { ends_at } => {
                self.vehicle.coast(self.config.vehicle.deceleration, dt);
                if now >= ends_at {
                    self.finish_dwell(now)
                } else {
                    self.mission.status_message = format!(
                        "Performing task: {}.",
                        self.mission.current_task_label()
                    );
                    Ok(())
                }
            }
            MissionPhase::Active => self.advance(dt, now, viewport),
        }
    }

    fn advance(&mut self, dt: f64, now: f64, viewport: &Viewport) -> SimResult<()> {
        if self.mission.all_visited() {
            return self.complete(now);
        }

        let index = self.mission.current_waypoint;
        let (target, task) = match self.mission.current_target() {
            Some(waypoint) => (waypoint.position, waypoint.task.clone()),
            None => return self.lose_target(index),
        };

        if self.controller.has_arrived(&self.vehicle.position, &target) {
            return self.arrive(now);
        }

        let command = self.controller.seek(&mut self.vehicle, &target, dt);
        if command.step_length > 0.0 {
            match self.obstacles.check(&command.proposed, viewport) {
                Ok(()) => {
                    let previous = self.vehicle.position;
                    self.vehicle.record_track(previous, now);
                    self.vehicle.position = command.proposed;
                    self.mission.total_distance += command.step_length;
                    self.mission.status_message = format!(
                        "Moving to waypoint {} ({}). Distance remaining: {}m.",
                        index + 1,
                        task,
                        command.distance_to_target.round()
                    );
                }
                Err(blocked) => {
                    let heading = self.obstacles.evade(self.vehicle.heading(), &mut self.rng);
                    self.vehicle.set_heading(heading);
                    self.mission.error_count += self.obstacles.evasion_penalty();
                    self.mission.status_message = match blocked {
                        SimulationError::BoundaryBlocked => "Adjusting course at boundary.",
                        _ => "Evading obstacle.",
                    }
                    .to_string();
                }
            }
        }

        let depleted = self
            .power
            .apply(&mut self.vehicle, self.config.vehicle.max_speed, dt);

        let battery = self.vehicle.battery;
        if battery < self.config.vehicle.min_start_battery && !self.mission.low_battery_warned {
            warn!("Battery level critically low: {:.1}%", battery);
            self.mission.low_battery_warned = true;
            self.events.push(MissionEvent::LowBattery { battery });
        }

        if depleted {
            self.events.push(MissionEvent::Alert(
                SimulationError::BatteryDepleted.to_string(),
            ));
            self.emergency_stop()?;
            return Err(SimulationError::BatteryDepleted);
        }
        Ok(())
    }

    fn arrive(&mut self, now: f64) -> SimResult<()> {
        let index = self.mission.current_waypoint;
        let (task, dwell_seconds) = match self.mission.mark_reached(now) {
            Some(waypoint) => (waypoint.task.clone(), waypoint.dwell_duration),
            None => return self.lose_target(index),
        };
        let dwell = dwell_seconds * self.config.simulation.dwell_time_scale;

        self.mission.phase = self
            .mission
            .phase
            .transition(PhaseEvent::Arrive { dwell }, now)?;
        self.vehicle.current_task = Some(TaskAnimation {
            task_name: task.clone(),
            started_at: now,
            duration: dwell,
        });
        self.mission.status_message = format!("Performing task: {}.", task);
        info!(
            "Waypoint reached: {} at ({:.0}, {:.0})",
            task, self.vehicle.position.x, self.vehicle.position.y
        );
        self.events.push(MissionEvent::WaypointReached { index, task });
        Ok(())
    }

    fn finish_dwell(&mut self, now: f64) -> SimResult<()> {
        self.mission.phase = self
            .mission
            .phase
            .transition(PhaseEvent::DwellElapsed, now)?;
        self.vehicle.current_task = None;

        let index = self.mission.current_waypoint;
        let task = self.mission.current_task_label().to_string();
        self.events.push(MissionEvent::TaskCompleted { index, task });

        self.mission.current_waypoint += 1;
        if self.mission.all_visited() {
            return self.complete(now);
        }
        Ok(())
    }

    fn complete(&mut self, now: f64) -> SimResult<()> {
        self.mission.phase = self.mission.phase.transition(PhaseEvent::Finish, now)?;
        self.vehicle.halt();
        self.vehicle.current_task = None;

        let elapsed = self.mission.elapsed(now);
        let expected = self
            .mission
            .active_profile
            .as_deref()
            .and_then(|key| self.catalog.get(key).ok())
            .map(|profile| profile.expected_seconds())
            .unwrap_or(0.0);
        self.mission.efficiency = efficiency_score(elapsed, expected, self.mission.error_count);
        self.mission.status_message = "Mission complete.".to_string();

        let report = MissionReport {
            profile: self.selected_profile.clone(),
            waypoints: self.mission.waypoints.len(),
            distance: self.mission.total_distance,
            elapsed_seconds: elapsed,
            efficiency: self.mission.efficiency,
            error_count: self.mission.error_count,
        };
        info!(
            "Mission completed: distance {:.0}m, time {}, efficiency {}%",
            report.distance,
            format_hms(report.elapsed_seconds),
            report.efficiency
        );
        self.last_report = Some(report.clone());
        self.events.push(MissionEvent::MissionCompleted(report));
        Ok(())
    }

    /// Ends the mission once the current waypoint index no longer resolves
    fn lose_target(&mut self, index: usize) -> SimResult<()> {
        error!("Target waypoint {} not found", index);
        self.mission.error_count += 1.0;
        self.stop()?;
        Err(self.alert(SimulationError::TargetNotFound { index }))
    }

    fn alert(&mut self, err: SimulationError) -> SimulationError {
        warn!("{}", err);
        self.events.push(MissionEvent::Alert(err.to_string()));
        err
    }

    // ----- telemetry -----

    /// Records a telemetry sample into the rolling buffers and returns it
    pub fn sample_telemetry(&mut self) -> TelemetrySample {
        let sample = TelemetrySample {
            timestamp: self.time,
            distance: self.mission.total_distance,
            speed: self.vehicle.speed,
            battery: self.vehicle.battery,
            power_watts: self.vehicle.power_consumption_watts,
            health: self.health,
            environment: self.environment.clone(),
        };
        self.telemetry.record(&sample);
        sample
    }

    /// Advances the simulated system-health random walk
    pub fn monitor_health(&mut self) {
        self.health.random_walk(&mut self.rng);
    }

    // ----- read access -----

    /// Owned view for renderers
    pub fn snapshot(&self) -> FrameSnapshot {
        let vehicle = &self.vehicle;
        let mission = &self.mission;
        let task_progress = vehicle
            .current_task
            .as_ref()
            .map(|task| task.progress(self.time))
            .unwrap_or(0.0);

        FrameSnapshot {
            time: self.time,
            vehicle: VehicleView {
                position: vehicle.position,
                heading: vehicle.heading(),
                speed: vehicle.speed,
                battery: vehicle.battery,
                power_watts: vehicle.power_consumption_watts,
                track: vehicle.track_history().iter().copied().collect(),
                task: vehicle.current_task.clone(),
                task_progress,
            },
            waypoints: mission.waypoints.clone(),
            current_waypoint: mission.current_waypoint,
            phase: mission.phase,
            status_message: mission.status_message.clone(),
            obstacles: self.obstacles.obstacles().to_vec(),
            dashboard: DashboardView {
                status_label: mission.phase.label(),
                current_task: mission.current_task_label().to_string(),
                completed_tasks: mission.completed_tasks,
                waypoint_count: mission.waypoints.len(),
                progress_percent: mission.progress_percent(),
                eta: mission
                    .eta_seconds(&vehicle.position, vehicle.speed)
                    .map(format_hms),
                elapsed: format_hms(mission.elapsed(self.time)),
                total_distance: mission.total_distance,
                efficiency: mission.efficiency,
                heading_degrees: heading_degrees(vehicle.heading()),
                health_status: self.health.status(),
            },
        }
    }

    /// Takes the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<MissionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// Mutable rover access for scenario setup (battery, pose)
    pub fn vehicle_mut(&mut self) -> &mut VehicleState {
        &mut self.vehicle
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn health(&self) -> &SystemHealth {
        &self.health
    }

    pub fn power(&self) -> &PowerModel {
        &self.power
    }

    pub fn catalog(&self) -> &MissionCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Report of the last completed mission
    pub fn last_report(&self) -> Option<&MissionReport> {
        self.last_report.as_ref()
    }

    /// Simulation clock in seconds
    pub fn time(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_target_on_arrival_stops_the_mission() {
        let mut core = SimulationCore::new(SimConfig::default()).unwrap();
        core.start().unwrap();
        core.drain_events();
        core.mission.current_waypoint = 99;

        assert_eq!(core.arrive(1.0), Err(SimulationError::TargetNotFound { index: 99 }));
        assert_eq!(core.mission.phase, MissionPhase::Idle);
        assert_eq!(core.mission.error_count, 1.0);
        assert_eq!(core.vehicle.speed, 0.0);
        assert!(matches!(core.drain_events().as_slice(), [MissionEvent::Alert(_)]));
    }
}
