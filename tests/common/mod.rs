// tests/common/mod.rs
// Shared scenarios: an obstacle-free field with a short two-stop survey and a
// profile whose first stop is already inside the arrival radius.

#![allow(dead_code)]

use rover_sim::mission::{MissionCatalog, MissionProfile, WaypointTemplate};
use rover_sim::{SimConfig, SimulationCore, Viewport};

pub const DT: f64 = 1.0 / 60.0;

fn wp(x: f64, y: f64, task: &str, duration: f64) -> WaypointTemplate {
    WaypointTemplate { x, y, task: task.to_string(), duration }
}

pub fn test_catalog() -> MissionCatalog {
    let mut catalog = MissionCatalog::builtin();
    catalog.insert(
        "survey",
        MissionProfile {
            name: "Short Survey".to_string(),
            expected_duration_hours: 1.0,
            expected_distance: 200.0,
            waypoints: vec![
                wp(100.0, 100.0, "Start Position", 0.0),
                wp(200.0, 100.0, "Soil Sample", 1.0),
                wp(200.0, 200.0, "Imaging", 2.0),
            ],
        },
    );
    catalog.insert(
        "hop",
        MissionProfile {
            name: "Hop".to_string(),
            expected_duration_hours: 1.0,
            expected_distance: 300.0,
            waypoints: vec![
                wp(100.0, 100.0, "Start Position", 0.0),
                wp(110.0, 100.0, "Quick Look", 1.0),
                wp(300.0, 300.0, "Far Marker", 1.0),
            ],
        },
    );
    catalog
}

/// No obstacles, fixed seed, "survey" loaded
pub fn open_field_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.obstacles.clear();
    config.simulation.seed = Some(7);
    config.simulation.default_profile = "survey".to_string();
    config
}

pub fn open_field_core() -> SimulationCore {
    SimulationCore::with_catalog(open_field_config(), test_catalog()).expect("valid test config")
}

pub fn viewport() -> Viewport {
    Viewport::default()
}

/// Steps until `done` holds or `max_steps` pass; returns steps taken
pub fn run_until<F>(core: &mut SimulationCore, max_steps: usize, done: F) -> usize
where
    F: Fn(&SimulationCore) -> bool,
{
    let viewport = viewport();
    for step in 0..max_steps {
        if done(core) {
            return step;
        }
        let _ = core.step(DT, &viewport);
    }
    max_steps
}
