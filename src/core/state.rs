// core/state.rs

// Mission phase finite state machine (Idle, Active, Dwelling, Paused, Completed).
// Every phase change goes through `MissionPhase::transition`, so flag combinations
// such as "paused but not active" cannot be represented. Dwell deadlines are kept
// in simulation seconds and travel with the phase, which makes them cancellable
// by simply leaving the phase.

// Dependencies
use log::{debug, info};

use crate::error::{SimResult, SimulationError};

/// Mission phase
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum MissionPhase {
    #[default]
    Idle,                                        // No mission running
    Active,                                      // Driving toward the current waypoint
    Dwelling { ends_at: f64 },                   // Performing the waypoint task
    Paused { dwell_remaining: Option<f64> },     // Frozen; remembers unfinished dwell
    Completed,                                   // All waypoints visited
}

/// Inputs to the phase machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhaseEvent {
    /// Operator started the mission
    Start,
    /// Operator pressed pause/resume
    TogglePause,
    /// Operator stop, emergency stop or battery depletion
    Stop,
    /// Vehicle entered the arrival radius; `dwell` is in simulation seconds
    Arrive { dwell: f64 },
    /// Dwell deadline passed
    DwellElapsed,
    /// Last waypoint done
    Finish,
    /// New profile loaded or waypoints cleared
    Reset,
}

impl MissionPhase {
    /// Applies `event` at simulation time `now`.
    ///
    /// Invalid events leave the caller's phase untouched and return the reason.
    pub fn transition(self, event: PhaseEvent, now: f64) -> SimResult<MissionPhase> {
        use MissionPhase::*;

        let next = match (self, event) {
            (Idle, PhaseEvent::Start) => Active,
            (Completed, PhaseEvent::Start) => return Err(SimulationError::MissionCompleted),
            (_, PhaseEvent::Start) => return Err(SimulationError::MissionActive),

            (Active, PhaseEvent::TogglePause) => Paused { dwell_remaining: None },
            (Dwelling { ends_at }, PhaseEvent::TogglePause) => Paused {
                dwell_remaining: Some((ends_at - now).max(0.0)),
            },
            (Paused { dwell_remaining: None }, PhaseEvent::TogglePause) => Active,
            (Paused { dwell_remaining: Some(remaining) }, PhaseEvent::TogglePause) => Dwelling {
                ends_at: now + remaining,
            },

            (Completed, PhaseEvent::Stop) => Completed,
            (_, PhaseEvent::Stop) => Idle,

            (Active, PhaseEvent::Arrive { dwell }) => Dwelling {
                ends_at: now + dwell.max(0.0),
            },
            (Dwelling { .. }, PhaseEvent::DwellElapsed) => Active,
            (Active | Dwelling { .. }, PhaseEvent::Finish) => Completed,

            (_, PhaseEvent::Reset) => Idle,

            (phase, event) => {
                debug!("Ignoring {:?} in phase {:?}", event, phase);
                return Err(SimulationError::MissionInactive);
            }
        };

        if next != self {
            info!("Mission phase {} -> {}", self.label(), next.label());
        }
        Ok(next)
    }

    /// Mission running (including paused and dwelling)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            MissionPhase::Active | MissionPhase::Dwelling { .. } | MissionPhase::Paused { .. }
        )
    }

    /// Mission frozen by the operator
    pub fn is_paused(&self) -> bool {
        matches!(self, MissionPhase::Paused { .. })
    }

    /// Vehicle is seeking a waypoint
    pub fn is_moving(&self) -> bool {
        matches!(self, MissionPhase::Active)
    }

    /// Dashboard label
    pub fn label(&self) -> &'static str {
        match self {
            MissionPhase::Idle => "READY",
            MissionPhase::Active | MissionPhase::Dwelling { .. } => "ACTIVE",
            MissionPhase::Paused { .. } => "PAUSED",
            MissionPhase::Completed => "COMPLETE",
        }
    }
}
