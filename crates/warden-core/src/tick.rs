use crate::{PauseEdge, PauseSignal};

/// Explicit simulation context handed to every tick call.
///
/// Carries the pause state and the tick duration so nothing in the kernel reads global state or
/// wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
    pub paused: bool,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            seed,
            paused: false,
        }
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Time that counts towards simulation timers this tick: zero while paused, never negative.
    pub fn elapsed_seconds(&self) -> f32 {
        if self.paused {
            0.0
        } else {
            self.dt_seconds.max(0.0)
        }
    }
}

/// Monotonic tick source that owns the pause signal.
#[derive(Debug)]
pub struct SimClock {
    tick: u64,
    seed: u64,
    elapsed_seconds: f64,
    pause: PauseSignal,
}

impl SimClock {
    pub fn new(seed: u64) -> Self {
        Self {
            tick: 0,
            seed,
            elapsed_seconds: 0.0,
            pause: PauseSignal::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index of the next tick [`SimClock::advance`] will produce.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Accumulated unpaused simulation time.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) -> Option<PauseEdge> {
        self.pause.set_paused(paused)
    }

    pub fn pause_signal_mut(&mut self) -> &mut PauseSignal {
        &mut self.pause
    }

    pub fn advance(&mut self, dt_seconds: f32) -> TickContext {
        let ctx = TickContext::new(self.tick, dt_seconds, self.seed).with_paused(self.is_paused());
        self.tick += 1;
        self.elapsed_seconds += ctx.elapsed_seconds() as f64;
        ctx
    }
}
