// src/error.rs
// Error types for the rover simulator. Command failures carry a stable reason
// code so the UI layer can map them to alerts without matching on text.

use thiserror::Error;

/// Failure of a simulation command or of a single navigation step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Start requested with an empty waypoint list
    #[error("No mission waypoints loaded. Please load a mission profile first.")]
    NoMission,

    /// Battery below the level required to start a mission
    #[error("Battery too low to start mission ({battery:.1}%). Please recharge.")]
    InsufficientResources {
        /// Battery level at the time of the request
        battery: f64,
    },

    /// Battery reached zero while a mission was running
    #[error("Battery depleted. Mission aborted.")]
    BatteryDepleted,

    /// The active waypoint index does not point into the waypoint list
    #[error("Target waypoint {index} not found")]
    TargetNotFound {
        /// Index that failed to resolve
        index: usize,
    },

    /// Proposed position overlaps an obstacle
    #[error("Obstacle blocks the proposed position")]
    ObstacleBlocked,

    /// Proposed position leaves the drivable area
    #[error("Proposed position is outside the drivable area")]
    BoundaryBlocked,

    /// Unknown mission profile key
    #[error("Mission profile \"{0}\" not found. Please select another.")]
    ProfileNotFound(String),

    /// Command not allowed while a mission is running
    #[error("Command not available while a mission is active")]
    MissionActive,

    /// Command requires a running mission
    #[error("No mission is active")]
    MissionInactive,

    /// Mission already finished; a profile must be reloaded first
    #[error("Mission already completed. Load a mission profile to start again.")]
    MissionCompleted,

    /// Unknown telemetry chart key
    #[error("Unknown telemetry chart \"{0}\"")]
    UnknownChart(String),
}

impl SimulationError {
    /// Stable reason code for the command surface
    pub fn reason_code(&self) -> &'static str {
        match self {
            SimulationError::NoMission => "NO_MISSION",
            SimulationError::InsufficientResources { .. } => "INSUFFICIENT_RESOURCES",
            SimulationError::BatteryDepleted => "INSUFFICIENT_RESOURCES",
            SimulationError::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            SimulationError::ObstacleBlocked => "OBSTACLE_BLOCKED",
            SimulationError::BoundaryBlocked => "BOUNDARY_BLOCKED",
            SimulationError::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            SimulationError::MissionActive => "MISSION_ACTIVE",
            SimulationError::MissionInactive => "MISSION_INACTIVE",
            SimulationError::MissionCompleted => "MISSION_COMPLETED",
            SimulationError::UnknownChart(_) => "UNKNOWN_CHART",
        }
    }

    /// Navigation errors absorbed by evasion rather than surfaced to the user
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SimulationError::ObstacleBlocked | SimulationError::BoundaryBlocked
        )
    }
}

/// Configuration loading or validation failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for the expected schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result alias for simulation commands
pub type SimResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_errors_share_a_reason_code() {
        let low = SimulationError::InsufficientResources { battery: 12.0 };
        assert_eq!(low.reason_code(), SimulationError::BatteryDepleted.reason_code());
        assert!(!low.is_recoverable());
        assert!(SimulationError::BoundaryBlocked.is_recoverable());
    }
}
