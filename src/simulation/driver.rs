// simulation/driver.rs

// Frame driver: turns wall-clock ticks into bounded time steps, runs one full
// simulation step per frame, then hands the finished frame to the renderer.
// Telemetry sampling and the health random walk are scheduled on simulation
// time, so they only ever observe completed steps.

// Dependencies
use log::{debug, error, info};
use std::time::{Duration, Instant};

use super::snapshot::Renderer;
use super::SimulationCore;
use crate::config::Viewport;
use crate::core::state::MissionPhase;
use crate::error::SimResult;
use crate::telemetry::TelemetrySink;

/// Converts successive instants into clamped frame deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        FrameClock { last: None, max_dt }
    }

    /// Seconds since the previous tick, capped at `max_dt`; zero on the first tick
    pub fn tick(&mut self, now: Instant) -> f64 {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        dt.min(self.max_dt)
    }

    /// Forgets the previous tick, e.g. after the loop was suspended
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Owns the core and its collaborators and runs frames
pub struct FrameDriver<R: Renderer, S: TelemetrySink> {
    core: SimulationCore,
    renderer: R,
    sink: S,
    clock: FrameClock,
    viewport: Viewport,
    next_telemetry: f64,
    next_health: f64,
    frames: u64,
}

impl<R: Renderer, S: TelemetrySink> FrameDriver<R, S> {
    pub fn new(core: SimulationCore, renderer: R, sink: S) -> Self {
        let settings = &core.config().simulation;
        let clock = FrameClock::new(settings.max_frame_dt);
        let viewport = settings.viewport;
        let next_telemetry = core.time() + settings.telemetry_interval;
        let next_health = core.time() + settings.health_interval;
        FrameDriver {
            core,
            renderer,
            sink,
            clock,
            viewport,
            next_telemetry,
            next_health,
            frames: 0,
        }
    }

    /// Runs one frame timed by the wall clock
    pub fn run_frame(&mut self, now: Instant) -> SimResult<()> {
        let dt = self.clock.tick(now);
        self.advance(dt)
    }

    /// Runs one frame of `dt` seconds: step, periodic samplers, render
    pub fn advance(&mut self, dt: f64) -> SimResult<()> {
        let result = self.core.step(dt, &self.viewport);
        if let Err(e) = &result {
            error!("Frame {}: {}", self.frames, e);
        }

        let now = self.core.time();
        let settings = &self.core.config().simulation;
        let (health_interval, telemetry_interval) =
            (settings.health_interval, settings.telemetry_interval);

        if now >= self.next_health {
            self.core.monitor_health();
            self.next_health = now + health_interval;
        }
        if now >= self.next_telemetry {
            let sample = self.core.sample_telemetry();
            self.sink.publish(&sample);
            self.next_telemetry = now + telemetry_interval;
        }

        self.renderer.render(&self.core.snapshot());
        self.frames += 1;
        result
    }

    /// Runs fixed-size frames until the mission leaves its active phases or
    /// `max_frames` have elapsed; returns the number of frames run.
    ///
    /// With `realtime` set, frames are paced to the target rate.
    pub fn run_mission(&mut self, max_frames: u64, realtime: bool) -> u64 {
        let fps = self.core.config().simulation.target_fps.max(1);
        let frame_dt = 1.0 / fps as f64;
        let frame_period = Duration::from_secs_f64(frame_dt);
        let start_frames = self.frames;
        self.clock.reset();

        while self.frames - start_frames < max_frames {
            let frame_start = Instant::now();
            let outcome = if realtime {
                self.run_frame(frame_start)
            } else {
                self.advance(frame_dt)
            };
            if outcome.is_err() || !self.core.mission().phase.is_active() {
                break;
            }
            if realtime {
                let spent = frame_start.elapsed();
                if spent < frame_period {
                    std::thread::sleep(frame_period - spent);
                }
            }
        }

        let ran = self.frames - start_frames;
        match self.core.mission().phase {
            MissionPhase::Completed => info!("Mission finished after {} frames", ran),
            phase => debug!("Mission loop left after {} frames in {:?}", ran, phase),
        }
        ran
    }

    /// Resizes the drivable area
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn core(&self) -> &SimulationCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut SimulationCore {
        &mut self.core
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Gives back the core and collaborators
    pub fn into_parts(self) -> (SimulationCore, R, S) {
        (self.core, self.renderer, self.sink)
    }
}
