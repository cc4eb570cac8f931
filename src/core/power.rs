// core/power.rs

// Battery model. Drain per second is an idle floor, a term proportional to the
// speed ratio, and a term proportional to the summed draw of active sensors.
// The wattage figure shown on the dashboard is derived separately from speed
// and does not feed back into the drain.

// Dependencies
use log::warn;

use super::vehicle::VehicleState;
use crate::config::{PowerConfig, SensorSpec};

/// Battery drain model
#[derive(Clone, Debug)]
pub struct PowerModel {
    config: PowerConfig,
}

impl PowerModel {
    pub fn new(config: &PowerConfig) -> Self {
        PowerModel { config: config.clone() }
    }

    /// Summed draw of active sensors in watts
    pub fn active_sensor_watts(&self) -> f64 {
        self.config
            .sensors
            .iter()
            .filter(|s| s.active)
            .map(|s| s.power_watts)
            .sum()
    }

    /// Battery percent drained per second at `speed_ratio` (speed / max speed)
    pub fn drain_rate(&self, speed_ratio: f64) -> f64 {
        self.config.idle_rate
            + speed_ratio * self.config.movement_rate
            + self.active_sensor_watts() * self.config.sensor_rate_factor
    }

    /// Display wattage at `speed_ratio`
    pub fn consumption_watts(&self, speed_ratio: f64) -> f64 {
        self.config.base_watts + speed_ratio * self.config.range_watts
    }

    /// Drains the battery for `dt` seconds and refreshes the wattage readout.
    ///
    /// Returns true when the battery is empty afterwards.
    pub fn apply(&self, vehicle: &mut VehicleState, max_speed: f64, dt: f64) -> bool {
        let speed_ratio = if max_speed > 0.0 {
            (vehicle.speed / max_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        vehicle.battery = (vehicle.battery - self.drain_rate(speed_ratio) * dt).max(0.0);
        vehicle.power_consumption_watts = self.consumption_watts(speed_ratio);

        if vehicle.battery <= 0.0 {
            warn!("Battery depleted");
            return true;
        }
        false
    }

    /// Turns a sensor on or off; returns false when no sensor has that name
    pub fn set_sensor_active(&mut self, name: &str, active: bool) -> bool {
        match self.config.sensors.iter_mut().find(|s| s.name == name) {
            Some(sensor) => {
                sensor.active = active;
                true
            }
            None => false,
        }
    }

    pub fn sensors(&self) -> &[SensorSpec] {
        &self.config.sensors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VehicleConfig;
    use crate::core::geometry::Vec2;

    #[test]
    fn default_payload_draws_149_watts() {
        let model = PowerModel::new(&PowerConfig::default());
        assert!((model.active_sensor_watts() - 149.0).abs() < 1e-9);
    }

    #[test]
    fn drain_scales_with_speed() {
        let model = PowerModel::new(&PowerConfig::default());
        let mut rover = VehicleState::new(Vec2::zeros(), &VehicleConfig::default());
        rover.speed = 4.0;
        let empty = model.apply(&mut rover, 4.0, 1.0);
        assert!(!empty);
        // 0.001 + 0.005 + 149 * 0.0001
        assert!((rover.battery - (100.0 - 0.0209)).abs() < 1e-9);
        assert!((rover.power_consumption_watts - 310.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_sensor_stops_drawing() {
        let mut model = PowerModel::new(&PowerConfig::default());
        assert!(model.set_sensor_active("lidar", false));
        assert!(!model.set_sensor_active("sonar", false));
        assert!((model.active_sensor_watts() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn battery_floors_at_zero() {
        let model = PowerModel::new(&PowerConfig::default());
        let mut rover = VehicleState::new(Vec2::zeros(), &VehicleConfig::default());
        rover.battery = 0.001;
        assert!(model.apply(&mut rover, 4.0, 1.0));
        assert_eq!(rover.battery, 0.0);
    }
}
