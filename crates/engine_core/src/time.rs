//! Time management for the game loop.
//!
//! Two clocks live here. [`Time`] measures wall-clock frames and feeds a
//! fixed-step accumulator; [`SimClock`] is the simulation's own time, advanced
//! explicitly per tick so that deferred tasks fire deterministically.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for simulation (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
    /// Upper bound on a single frame's delta, so a stall does not
    /// trigger a burst of catch-up steps.
    max_delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.update_with(delta);
    }

    /// Feed an explicit frame delta (used by headless drivers and tests).
    pub fn update_with(&mut self, delta: Duration) {
        self.delta = delta.min(self.max_delta);
        self.frame_count += 1;
        self.accumulator += self.delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}

/// Simulation time in seconds, advanced once per simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    now: f64,
    ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds and return the new time.
    pub fn advance(&mut self, dt: f32) -> f64 {
        self.now += f64::from(dt.max(0.0));
        self.ticks += 1;
        self.now
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_update_consumes_accumulated_time() {
        let mut time = Time::new();
        time.set_fixed_rate(10.0);
        time.update_with(Duration::from_millis(250));
        let mut steps = 0;
        while time.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(time.frame_count(), 1);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut time = Time::new();
        time.update_with(Duration::from_secs(5));
        assert!(time.delta_seconds() <= 0.25 + f32::EPSILON);
    }

    #[test]
    fn sim_clock_ignores_negative_dt() {
        let mut clock = SimClock::new();
        clock.advance(0.5);
        clock.advance(-1.0);
        assert!((clock.now() - 0.5).abs() < 1e-9);
        assert_eq!(clock.ticks(), 2);
    }
}
