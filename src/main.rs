// src/main.rs
// Headless entry point: loads an optional YAML config, runs one mission profile
// to completion and logs progress, telemetry and the final report.
//
// Usage: rover-sim [config.yaml] [profile] [--realtime]

use log::{error, info};
use rover_sim::mission::format_hms;
use rover_sim::simulation::MissionEvent;
use rover_sim::{FrameDriver, FrameSnapshot, Renderer, SimConfig, SimulationCore, TelemetrySample, TelemetrySink};
use std::error::Error;

/// Logs a one-line frame summary every `every` frames
struct LogRenderer {
    every: u64,
    frame: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.frame += 1;
        if self.frame % self.every == 0 {
            info!(
                "[{}] {} pos=({:.0}, {:.0}) hdg={:.0} spd={:.2} batt={:.1}% wp {}/{} | {}",
                format_hms(frame.time),
                frame.dashboard.status_label,
                frame.vehicle.position.x,
                frame.vehicle.position.y,
                frame.dashboard.heading_degrees,
                frame.vehicle.speed,
                frame.vehicle.battery,
                frame.dashboard.completed_tasks,
                frame.dashboard.waypoint_count,
                frame.status_message
            );
        }
    }
}

/// Prints telemetry samples at debug level
struct LogSink;

impl TelemetrySink for LogSink {
    fn publish(&mut self, sample: &TelemetrySample) {
        log::debug!(
            "telemetry t={:.0}s dist={:.0} spd={:.1} batt={:.1}% power={:.0}W cpu={:.0}%",
            sample.timestamp,
            sample.distance,
            sample.speed,
            sample.battery,
            sample.power_watts,
            sample.health.cpu
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting rover mission simulator...");

    let mut realtime = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--realtime" {
            realtime = true;
        } else {
            positional.push(arg);
        }
    }

    let config = match positional.first() {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    let fps = u64::from(config.simulation.target_fps);
    let mut core = SimulationCore::new(config)?;

    if let Some(profile) = positional.get(1) {
        core.load_profile(profile)?;
    }
    if let Some(key) = &core.mission().active_profile {
        let info = core.profile_info(key)?;
        info!(
            "Profile {}: {} hours, {} meters, {} locations",
            info.name, info.duration_hours, info.distance, info.waypoint_count
        );
    }
    core.start()?;

    let renderer = LogRenderer { every: fps * 10, frame: 0 };
    let mut driver = FrameDriver::new(core, renderer, LogSink);

    // ten hours of simulated time at the target rate
    let max_frames = fps * 3600 * 10;
    driver.run_mission(max_frames, realtime);

    for event in driver.core_mut().drain_events() {
        match event {
            MissionEvent::Alert(message) => error!("ALERT: {}", message),
            MissionEvent::MissionCompleted(report) => info!(
                "Mission complete: {} waypoints, {:.0}m in {}, efficiency {}%",
                report.waypoints,
                report.distance,
                format_hms(report.elapsed_seconds),
                report.efficiency
            ),
            other => log::debug!("{:?}", other),
        }
    }

    info!("Rover simulator finished after {} frames", driver.frames());
    Ok(())
}
