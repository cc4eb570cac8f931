// telemetry/health.rs

// Simulated onboard health (CPU, memory, board temperature, link quality) and
// ambient environment readings. Health drifts as a bounded random walk sampled
// every couple of seconds; the link walk is biased upward so it recovers.

// Dependencies
use log::{debug, warn};
use rand::Rng;

/// Overall health classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Optimal,
    Degraded,  // average below 70
    Critical,  // average below 50
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Optimal => "OPTIMAL",
            HealthStatus::Degraded => "DEGRADED",
            HealthStatus::Critical => "CRITICAL",
        }
    }
}

/// Onboard computer health
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SystemHealth {
    pub cpu: f64,           // percent
    pub memory: f64,        // percent
    pub temperature: f64,   // Celsius
    pub communication: f64, // link quality percent
}

impl Default for SystemHealth {
    fn default() -> Self {
        SystemHealth {
            cpu: 25.0,
            memory: 45.0,
            temperature: 35.0,
            communication: 98.0,
        }
    }
}

impl SystemHealth {
    /// One step of the bounded random walk
    pub fn random_walk<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cpu = (self.cpu + rng.gen_range(-2.5..2.5)).clamp(15.0, 95.0);
        self.memory = (self.memory + rng.gen_range(-1.5..1.5)).clamp(25.0, 85.0);
        self.temperature = (self.temperature + rng.gen_range(-1.0..1.0)).clamp(25.0, 45.0);
        self.communication = (self.communication + rng.gen_range(-1.6..2.4)).clamp(75.0, 100.0);

        match self.status() {
            HealthStatus::Critical => warn!(
                "System health {}: cpu {:.0}%, memory {:.0}%, link {:.0}%",
                self.status().label(),
                self.cpu,
                self.memory,
                self.communication
            ),
            status => debug!("System health {} (avg {:.0})", status.label(), self.average()),
        }
    }

    /// Mean of cpu, memory and link quality
    pub fn average(&self) -> f64 {
        (self.cpu + self.memory + self.communication) / 3.0
    }

    pub fn status(&self) -> HealthStatus {
        let avg = self.average();
        if avg < 50.0 {
            HealthStatus::Critical
        } else if avg < 70.0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Optimal
        }
    }
}

/// Ambient conditions
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub terrain: String,
    pub temperature: f64,      // Celsius
    pub solar_irradiance: f64, // W/m^2
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            terrain: "surface".to_string(),
            temperature: 20.0,
            solar_irradiance: 600.0,
        }
    }
}
