// tests/mission_tests.rs
// Mission lifecycle through the command surface, scoring and the profile catalog.

mod common;

use common::{open_field_core, run_until, viewport, DT};
use rover_sim::mission::scoring::time_efficiency;
use rover_sim::mission::{efficiency_score, format_hms};
use rover_sim::simulation::MissionEvent;
use rover_sim::{MissionCatalog, MissionPhase, SimulationCore, SimulationError};
use rstest::{fixture, rstest};

#[fixture]
fn sim() -> SimulationCore {
    open_field_core()
}

fn completion_count(events: &[MissionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, MissionEvent::MissionCompleted(_)))
        .count()
}

#[rstest]
fn start_without_waypoints_is_rejected(mut sim: SimulationCore) {
    sim.clear_waypoints().expect("idle mission can be cleared");

    assert_eq!(sim.start(), Err(SimulationError::NoMission));
    assert!(!sim.mission().phase.is_active());
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, MissionEvent::Alert(_))));
}

#[rstest]
#[case(19.0, false)]
#[case(19.99, false)]
#[case(20.0, true)]
#[case(55.0, true)]
fn start_requires_minimum_battery(mut sim: SimulationCore, #[case] battery: f64, #[case] starts: bool) {
    sim.vehicle_mut().battery = battery;
    let result = sim.start();

    if starts {
        assert_eq!(result, Ok(()));
        assert_eq!(sim.mission().phase, MissionPhase::Active);
    } else {
        assert_eq!(result, Err(SimulationError::InsufficientResources { battery }));
        assert_eq!(sim.mission().phase, MissionPhase::Idle);
    }
}

#[rstest]
fn start_marks_the_first_waypoint_done(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    let mission = sim.mission();

    assert_eq!(mission.current_waypoint, 1);
    assert_eq!(mission.completed_tasks, 1);
    assert!(mission.waypoints[0].completed);
    assert!(!mission.waypoints[1].completed);
    assert_eq!(sim.vehicle().target_speed, sim.config().vehicle.cruise_speed);
}

#[rstest]
fn second_start_is_rejected(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    assert_eq!(sim.start(), Err(SimulationError::MissionActive));
}

#[rstest]
fn double_pause_restores_the_phase(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    let before = sim.mission().phase;

    assert_eq!(sim.pause(), Ok(true));
    assert!(sim.mission().phase.is_paused());
    assert_eq!(sim.pause(), Ok(false));
    assert_eq!(sim.mission().phase, before);
}

#[rstest]
fn pause_is_rejected_when_idle(mut sim: SimulationCore) {
    assert_eq!(sim.pause(), Err(SimulationError::MissionInactive));
    assert_eq!(sim.mission().phase, MissionPhase::Idle);
}

#[rstest]
fn paused_rover_does_not_move(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    run_until(&mut sim, 60, |_| false);
    sim.pause().expect("pause");

    let parked = sim.vehicle().position;
    run_until(&mut sim, 300, |_| false);
    assert_eq!(sim.vehicle().position, parked);
    assert_eq!(sim.vehicle().speed, 0.0);
    assert_eq!(sim.mission().status_message, "Mission paused.");
}

#[rstest]
fn mission_completes_exactly_once(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    let steps = run_until(&mut sim, 20_000, |c| c.mission().phase == MissionPhase::Completed);
    assert!(steps < 20_000, "mission did not finish");

    let events = sim.drain_events();
    assert_eq!(completion_count(&events), 1);
    let reached: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            MissionEvent::WaypointReached { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(reached, vec![1, 2]);

    let report = sim.last_report().expect("report after completion").clone();
    assert_eq!(report.profile, "survey");
    assert_eq!(report.waypoints, 3);
    assert_eq!(report.efficiency, 100);
    assert_eq!(report.error_count, 0.0);
    assert!(report.distance > 100.0 && report.distance < 250.0);
    assert_eq!(sim.mission().completed_tasks, 3);
    assert_eq!(sim.mission().progress_percent(), 100.0);

    // nothing moves or completes again afterwards
    let parked = sim.vehicle().position;
    run_until(&mut sim, 600, |_| false);
    assert_eq!(sim.vehicle().position, parked);
    assert_eq!(completion_count(&sim.drain_events()), 0);
    assert_eq!(sim.mission().phase, MissionPhase::Completed);
    assert_eq!(sim.start(), Err(SimulationError::MissionCompleted));
}

#[rstest]
fn dwell_holds_the_rover_then_moves_on(mut sim: SimulationCore) {
    sim.load_profile("hop").expect("test profile");
    sim.start().expect("mission starts");
    let view = viewport();

    // first waypoint is already inside the arrival radius
    sim.step(DT, &view).expect("step");
    assert!(matches!(sim.mission().phase, MissionPhase::Dwelling { .. }));
    assert_eq!(sim.vehicle().current_task.as_ref().map(|t| t.task_name.as_str()), Some("Quick Look"));

    for _ in 0..30 {
        sim.step(DT, &view).expect("step");
    }
    assert!(matches!(sim.mission().phase, MissionPhase::Dwelling { .. }));
    assert_eq!(sim.mission().current_waypoint, 1);

    for _ in 0..60 {
        sim.step(DT, &view).expect("step");
    }
    assert_eq!(sim.mission().current_waypoint, 2);
    assert!(sim.vehicle().current_task.is_none());
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, MissionEvent::TaskCompleted { index: 1, .. })));
}

#[rstest]
fn stop_cancels_a_pending_dwell(mut sim: SimulationCore) {
    sim.load_profile("hop").expect("test profile");
    sim.start().expect("mission starts");
    let view = viewport();
    sim.step(DT, &view).expect("step");
    assert!(matches!(sim.mission().phase, MissionPhase::Dwelling { .. }));

    sim.stop().expect("stop");
    assert_eq!(sim.mission().phase, MissionPhase::Idle);
    sim.drain_events();

    run_until(&mut sim, 600, |_| false);
    assert_eq!(sim.mission().current_waypoint, 1);
    assert!(sim.drain_events().is_empty());
    assert_eq!(sim.mission().phase, MissionPhase::Idle);
}

#[rstest]
fn pause_during_dwell_freezes_the_remaining_time(mut sim: SimulationCore) {
    sim.load_profile("hop").expect("test profile");
    sim.start().expect("mission starts");
    let view = viewport();
    sim.step(DT, &view).expect("step");
    sim.pause().expect("pause");

    run_until(&mut sim, 600, |_| false);
    assert!(sim.mission().phase.is_paused());
    assert_eq!(sim.mission().current_waypoint, 1);

    sim.pause().expect("resume");
    assert!(matches!(sim.mission().phase, MissionPhase::Dwelling { .. }));
    run_until(&mut sim, 120, |_| false);
    assert_eq!(sim.mission().current_waypoint, 2);
}

#[rstest]
fn emergency_stop_counts_an_error(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    sim.emergency_stop().expect("emergency stop");

    assert_eq!(sim.mission().phase, MissionPhase::Idle);
    assert_eq!(sim.mission().error_count, 1.0);
    assert_eq!(sim.vehicle().speed, 0.0);
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, MissionEvent::Alert(_))));
}

#[rstest]
fn emergency_stop_after_completion_keeps_the_score(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    run_until(&mut sim, 20_000, |c| c.mission().phase == MissionPhase::Completed);
    let report = sim.last_report().expect("report after completion").clone();
    sim.drain_events();

    sim.emergency_stop().expect("emergency stop");
    assert_eq!(sim.mission().phase, MissionPhase::Completed);
    assert_eq!(sim.mission().error_count, report.error_count);
    assert_eq!(sim.mission().efficiency, report.efficiency);
    assert!(matches!(sim.drain_events().as_slice(), [MissionEvent::Alert(_)]));
}

#[rstest]
fn empty_battery_aborts_the_mission(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    sim.vehicle_mut().battery = 1e-6;

    assert_eq!(sim.step(DT, &viewport()), Err(SimulationError::BatteryDepleted));
    assert_eq!(sim.mission().phase, MissionPhase::Idle);
    assert_eq!(sim.vehicle().battery, 0.0);
    assert_eq!(sim.vehicle().speed, 0.0);

    let events = sim.drain_events();
    assert!(events.iter().any(|e| matches!(e, MissionEvent::LowBattery { .. })));
    assert!(events.iter().any(|e| matches!(e, MissionEvent::Alert(_))));
}

#[rstest]
fn low_battery_warning_fires_once(mut sim: SimulationCore) {
    sim.vehicle_mut().battery = 20.0;
    sim.start().expect("mission starts");

    run_until(&mut sim, 600, |_| false);
    let warnings = sim
        .drain_events()
        .iter()
        .filter(|e| matches!(e, MissionEvent::LowBattery { .. }))
        .count();
    assert_eq!(warnings, 1);
}

#[rstest]
fn commands_that_rewrite_the_mission_wait_for_idle(mut sim: SimulationCore) {
    sim.start().expect("mission starts");

    assert_eq!(sim.load_profile("rescue"), Err(SimulationError::MissionActive));
    assert_eq!(sim.clear_waypoints(), Err(SimulationError::MissionActive));
    assert_eq!(sim.optimize_path(), Err(SimulationError::MissionActive));
    assert_eq!(sim.mission().active_profile.as_deref(), Some("survey"));
}

#[rstest]
fn unknown_profile_raises_an_alert(mut sim: SimulationCore) {
    let result = sim.load_profile("lunar");

    assert_eq!(result, Err(SimulationError::ProfileNotFound("lunar".to_string())));
    assert_eq!(sim.mission().active_profile.as_deref(), Some("survey"));
    assert!(sim
        .drain_events()
        .iter()
        .any(|e| matches!(e, MissionEvent::Alert(_))));
}

#[rstest]
fn loading_a_profile_parks_the_rover_on_its_start(mut sim: SimulationCore) {
    sim.load_profile("infrastructure").expect("builtin profile");
    let first = sim.mission().waypoints[0].position;

    assert_eq!(sim.vehicle().position, first);
    assert_eq!(sim.mission().phase, MissionPhase::Idle);
    assert_eq!(sim.mission().waypoints.len(), 8);
    assert_eq!(sim.mission().waypoints[7].task, "Final Report");
}

#[rstest]
fn reset_after_completion_reloads_the_profile(mut sim: SimulationCore) {
    sim.start().expect("mission starts");
    run_until(&mut sim, 20_000, |c| c.mission().phase == MissionPhase::Completed);
    assert_eq!(sim.mission().phase, MissionPhase::Completed);

    sim.reset().expect("reset");
    assert_eq!(sim.mission().phase, MissionPhase::Idle);
    assert_eq!(sim.mission().current_waypoint, 0);
    assert!(sim.mission().waypoints.iter().all(|w| !w.completed));
    assert_eq!(sim.vehicle().position, sim.mission().waypoints[0].position);
    assert_eq!(sim.start(), Ok(()));
}

#[rstest]
#[case(3600.0, 3600.0, 0.0, 100)]
#[case(3600.0, 3600.0, 4.0, 80)]
#[case(1800.0, 3600.0, 0.0, 100)]
#[case(5400.0, 3600.0, 0.0, 50)]
#[case(3600.0, 3600.0, 0.2, 99)]
#[case(3600.0, 3600.0, 30.0, 0)]
#[case(9000.0, 3600.0, 0.0, 0)]
fn efficiency_scoring(#[case] actual: f64, #[case] expected: f64, #[case] errors: f64, #[case] score: u32) {
    assert_eq!(efficiency_score(actual, expected, errors), score);
}

#[test]
fn time_efficiency_without_a_plan_is_full() {
    assert_eq!(time_efficiency(1234.0, 0.0), 100.0);
}

#[rstest]
#[case(0.0, "00:00:00")]
#[case(59.9, "00:00:59")]
#[case(3725.0, "01:02:05")]
#[case(-4.0, "00:00:00")]
fn hms_formatting(#[case] seconds: f64, #[case] text: &str) {
    assert_eq!(format_hms(seconds), text);
}

#[test]
fn builtin_catalog_profile_info() {
    let catalog = MissionCatalog::builtin();
    let keys: Vec<&str> = catalog.keys().collect();
    assert_eq!(keys, vec!["geological", "infrastructure", "rescue"]);

    let info = catalog.profile_info("geological").expect("geological");
    assert_eq!(info.name, "Geological Survey");
    assert_eq!(info.duration_hours, 4.5);
    assert_eq!(info.distance, 150.0);
    assert_eq!(info.waypoint_count, 7);
    assert_eq!(
        catalog.profile_info("orbital"),
        Err(SimulationError::ProfileNotFound("orbital".to_string()))
    );
}

#[test]
fn catalog_reads_profiles_from_yaml() {
    let yaml = r#"
quarry:
  name: Quarry Walk
  duration: 0.5
  distance: 80
  waypoints:
    - { x: 100, y: 100, task: Start Position, duration: 0 }
    - { x: 160, y: 120, task: Photo, duration: 5 }
"#;
    let catalog = MissionCatalog::from_yaml_str(yaml).expect("valid catalog");
    let profile = catalog.get("quarry").expect("quarry");

    assert_eq!(catalog.len(), 1);
    assert_eq!(profile.expected_seconds(), 1800.0);
    assert_eq!(profile.waypoints[1].task, "Photo");
}

#[test]
fn catalog_rejects_profiles_without_waypoints() {
    let yaml = "empty:\n  name: Empty\n  duration: 1\n  distance: 0\n  waypoints: []\n";
    assert!(MissionCatalog::from_yaml_str(yaml).is_err());
}
