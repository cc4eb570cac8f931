//! Telemetry for the dashboard
//!
//! Periodic samples of mission, health, power and environment figures are kept
//! in fixed-length rolling windows (oldest dropped first), one window per chart.
//! Nothing is persisted. Samples are also handed to a [`TelemetrySink`] so an
//! external dashboard can display them.

pub mod health;

pub use health::{Environment, HealthStatus, SystemHealth};

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;
use crate::mission::format_hms;

/// Chart datasets the dashboard can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartType {
    /// Distance and speed
    MissionProgress,
    /// CPU, memory and board temperature
    SystemHealth,
    /// Wattage and battery
    PowerConsumption,
    /// Ambient temperature and solar irradiance
    Environmental,
}

impl ChartType {
    /// All charts in dashboard order
    pub const ALL: [ChartType; 4] = [
        ChartType::MissionProgress,
        ChartType::SystemHealth,
        ChartType::PowerConsumption,
        ChartType::Environmental,
    ];

    /// Selector key
    pub fn key(&self) -> &'static str {
        match self {
            ChartType::MissionProgress => "mission_progress",
            ChartType::SystemHealth => "system_health",
            ChartType::PowerConsumption => "power_consumption",
            ChartType::Environmental => "environmental",
        }
    }

    fn series_labels(&self) -> &'static [&'static str] {
        match self {
            ChartType::MissionProgress => &["Distance (m)", "Speed (m/s)"],
            ChartType::SystemHealth => &["CPU (%)", "Memory (%)", "Temperature (C)"],
            ChartType::PowerConsumption => &["Power (W)", "Battery (%)"],
            ChartType::Environmental => &["Temperature (C)", "Solar Irradiance"],
        }
    }

    fn index(&self) -> usize {
        match self {
            ChartType::MissionProgress => 0,
            ChartType::SystemHealth => 1,
            ChartType::PowerConsumption => 2,
            ChartType::Environmental => 3,
        }
    }
}

impl FromStr for ChartType {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|chart| chart.key() == s)
            .ok_or_else(|| SimulationError::UnknownChart(s.to_string()))
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One line of a chart
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Legend text
    pub label: &'static str,
    /// Values, oldest first
    pub values: VecDeque<f64>,
}

/// Rolling window of labelled samples for one chart
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    /// Time labels, oldest first
    pub labels: VecDeque<String>,
    /// One entry per plotted quantity
    pub series: Vec<Series>,
    window: usize,
}

impl ChartData {
    fn new(chart: ChartType, window: usize) -> Self {
        ChartData {
            labels: VecDeque::with_capacity(window),
            series: chart
                .series_labels()
                .iter()
                .map(|label| Series {
                    label: *label,
                    values: VecDeque::with_capacity(window),
                })
                .collect(),
            window,
        }
    }

    fn push(&mut self, label: String, values: &[f64]) {
        if self.labels.len() >= self.window {
            self.labels.pop_front();
            for series in self.series.iter_mut() {
                series.values.pop_front();
            }
        }
        self.labels.push_back(label);
        for (series, value) in self.series.iter_mut().zip(values) {
            series.values.push_back(*value);
        }
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// No samples yet
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Snapshot handed to the dashboard each telemetry period
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetrySample {
    /// Simulation time of the sample
    pub timestamp: f64,
    /// Mission distance so far
    pub distance: f64,
    /// Current speed
    pub speed: f64,
    /// Battery percent
    pub battery: f64,
    /// Display wattage
    pub power_watts: f64,
    /// Onboard health
    pub health: SystemHealth,
    /// Ambient conditions
    pub environment: Environment,
}

/// Receiver of periodic telemetry samples
pub trait TelemetrySink {
    /// Called once per telemetry period
    fn publish(&mut self, sample: &TelemetrySample);
}

/// Rolling telemetry buffers plus the dashboard's chart selection
#[derive(Clone, Debug)]
pub struct Telemetry {
    charts: Vec<ChartData>,
    selected: ChartType,
}

impl Telemetry {
    /// Empty buffers holding at most `window` samples each
    pub fn new(window: usize) -> Self {
        Telemetry {
            charts: ChartType::ALL
                .iter()
                .map(|chart| ChartData::new(*chart, window.max(1)))
                .collect(),
            selected: ChartType::MissionProgress,
        }
    }

    /// Appends a sample to every chart
    pub fn record(&mut self, sample: &TelemetrySample) {
        let label = format_hms(sample.timestamp);
        let h = &sample.health;
        let rows: [(ChartType, Vec<f64>); 4] = [
            (
                ChartType::MissionProgress,
                vec![sample.distance.round(), (sample.speed * 10.0).round() / 10.0],
            ),
            (
                ChartType::SystemHealth,
                vec![h.cpu.round(), h.memory.round(), h.temperature.round()],
            ),
            (
                ChartType::PowerConsumption,
                vec![sample.power_watts.round(), sample.battery.round()],
            ),
            (
                ChartType::Environmental,
                vec![
                    sample.environment.temperature.round(),
                    (sample.environment.solar_irradiance / 10.0).round(),
                ],
            ),
        ];
        for (chart, values) in rows {
            self.charts[chart.index()].push(label.clone(), &values);
        }
    }

    /// Switches the dashboard chart by key
    pub fn select(&mut self, key: &str) -> Result<ChartType, SimulationError> {
        let chart: ChartType = key.parse()?;
        self.selected = chart;
        log::debug!("Selected chart {}", chart);
        Ok(chart)
    }

    pub fn selected(&self) -> ChartType {
        self.selected
    }

    /// Data of the selected chart
    pub fn selected_chart(&self) -> &ChartData {
        self.chart(self.selected)
    }

    pub fn chart(&self, chart: ChartType) -> &ChartData {
        &self.charts[chart.index()]
    }
}
