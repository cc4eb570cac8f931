// mission/scoring.rs

// Post-mission efficiency. Time efficiency starts at 100 and loses one point per
// percent of overrun against the planned duration; every accumulated error
// (fractional evasion penalties included) costs five points.

/// Points deducted per accumulated error
pub const ERROR_PENALTY: f64 = 5.0;

/// Time component of the score, 0..=100
pub fn time_efficiency(actual_seconds: f64, expected_seconds: f64) -> f64 {
    if expected_seconds <= 0.0 {
        return 100.0;
    }
    let overrun_pct = ((actual_seconds - expected_seconds) / expected_seconds * 100.0).max(0.0);
    (100.0 - overrun_pct).max(0.0)
}

/// Final efficiency score, 0..=100
pub fn efficiency_score(actual_seconds: f64, expected_seconds: f64, error_count: f64) -> u32 {
    let raw = time_efficiency(actual_seconds, expected_seconds) - ERROR_PENALTY * error_count;
    raw.round().max(0.0) as u32
}

/// Final figures of a completed mission
#[derive(Clone, Debug, PartialEq)]
pub struct MissionReport {
    pub profile: String,
    pub waypoints: usize,
    pub distance: f64,
    pub elapsed_seconds: f64,
    pub efficiency: u32,
    pub error_count: f64,
}

/// Formats seconds as HH:MM:SS
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
