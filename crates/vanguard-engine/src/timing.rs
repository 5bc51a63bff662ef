//! Frame timing.
//!
//! Tracks the wall-clock delta between frames in milliseconds, the total
//! elapsed time, and a rolling frame-time average for FPS reporting. The
//! delta is clamped so a stall (debugger, window drag) cannot feed the
//! simulation a catastrophic step.

use std::collections::VecDeque;
use std::time::Instant;

/// Maximum delta handed to the simulation, in milliseconds.
const MAX_DELTA_MS: f32 = 250.0;

/// Number of frame samples kept for averaging.
const MAX_SAMPLES: usize = 120;

/// Wall-clock frame timer, in milliseconds.
#[derive(Debug)]
pub struct GameClock {
    /// Time of the last frame start
    last_frame: Instant,
    /// Delta of the most recent frame
    delta_ms: f32,
    /// Total accumulated (clamped) time
    total_ms: f64,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl GameClock {
    /// Creates a clock starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_ms: 0.0,
            total_ms: 0.0,
            frame_times: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Marks a new frame and returns its clamped delta in milliseconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;

        self.record(delta.min(MAX_DELTA_MS));
        self.delta_ms
    }

    /// Advances the clock by a fixed delta without consulting the wall
    /// clock. Used by tests and scripted playback.
    pub fn advance(&mut self, delta_ms: f32) -> f32 {
        self.record(delta_ms.min(MAX_DELTA_MS));
        self.delta_ms
    }

    fn record(&mut self, delta_ms: f32) {
        self.delta_ms = delta_ms;
        self.total_ms += f64::from(delta_ms);

        self.frame_times.push_back(delta_ms);
        if self.frame_times.len() > MAX_SAMPLES {
            self.frame_times.pop_front();
        }
    }

    /// Delta of the most recent frame, in milliseconds.
    #[must_use]
    pub const fn delta_ms(&self) -> f32 {
        self.delta_ms
    }

    /// Total elapsed (clamped) time, in milliseconds.
    #[must_use]
    pub const fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// Average frame time over the sample window, in milliseconds.
    #[must_use]
    pub fn average_frame_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    /// Frames per second derived from the average frame time.
    #[must_use]
    pub fn fps(&self) -> f32 {
        let avg = self.average_frame_ms();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }
}
