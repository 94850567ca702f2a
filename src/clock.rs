//! Bar clock: tempo, run state, and bar-boundary registrations.
//!
//! The transport does not thread or sleep. Drivers decide when a bar has
//! elapsed (the REPL from wall time, tests by calling it directly) and the
//! transport hands back whichever registrations were armed for that
//! boundary. Tokens are domain-free; callers map them to slots.

use std::time::Duration;

pub const BPM_MIN: f32 = 40.0;
pub const BPM_MAX: f32 = 300.0;

/// Handle for one armed bar-boundary registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryToken(u64);

#[derive(Debug)]
pub struct Transport {
    running: bool,
    bpm: f32,
    beats_per_bar: u32,
    bars_elapsed: u64,
    next_token: u64,
    armed: Vec<BoundaryToken>,
}

impl Transport {
    pub fn new(bpm: f32, beats_per_bar: u32) -> Self {
        Transport {
            running: false,
            bpm: bpm.clamp(BPM_MIN, BPM_MAX),
            beats_per_bar: beats_per_bar.max(1),
            bars_elapsed: 0,
            next_token: 0,
            armed: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Set the tempo; returns the value actually applied after clamping.
    pub fn set_bpm(&mut self, bpm: f32) -> f32 {
        self.bpm = bpm.clamp(BPM_MIN, BPM_MAX);
        self.bpm
    }

    pub fn nudge_bpm(&mut self, delta: f32) -> f32 {
        self.set_bpm(self.bpm + delta)
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    pub fn beat_duration(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.bpm as f64)
    }

    pub fn bar_duration(&self) -> Duration {
        self.beat_duration() * self.beats_per_bar
    }

    pub fn bars_elapsed(&self) -> u64 {
        self.bars_elapsed
    }

    /// Register interest in the next bar boundary.
    pub fn arm(&mut self) -> BoundaryToken {
        let token = BoundaryToken(self.next_token);
        self.next_token += 1;
        self.armed.push(token);
        token
    }

    /// Withdraw a registration before it fires. Returns whether it was
    /// still armed.
    pub fn cancel(&mut self, token: BoundaryToken) -> bool {
        match self.armed.iter().position(|t| *t == token) {
            Some(at) => {
                self.armed.remove(at);
                true
            }
            None => false,
        }
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Cross a bar boundary: advance the bar count and drain every armed
    /// registration, in the order they were armed.
    pub fn fire_bar(&mut self) -> Vec<BoundaryToken> {
        self.bars_elapsed += 1;
        std::mem::take(&mut self.armed)
    }
}
