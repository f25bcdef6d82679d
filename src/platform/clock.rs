//! Fixed-interval tick clock
//!
//! Frame callbacks arrive at whatever rate the host manages; the clock turns
//! elapsed time into a whole number of ticks. The caller runs those ticks one
//! after another, so ticks never overlap.

/// Maximum ticks released per frame to prevent a spiral of death
pub const MAX_TICKS_PER_FRAME: u32 = 4;

/// Longest frame gap honoured, in ms (a backgrounded tab can stall for ages)
const MAX_FRAME_MS: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct TickClock {
    interval_ms: f64,
    accumulator: f64,
    armed: bool,
}

impl TickClock {
    /// A running clock ticking every `interval_ms`
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms.max(1)),
            accumulator: 0.0,
            armed: true,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Stop releasing ticks (game over)
    pub fn stop(&mut self) {
        self.armed = false;
        self.accumulator = 0.0;
    }

    /// Start again from a clean slate (restart)
    pub fn rearm(&mut self) {
        self.armed = true;
        self.accumulator = 0.0;
    }

    /// Feed elapsed frame time; returns how many ticks are due
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.armed {
            return 0;
        }
        self.accumulator += dt_ms.clamp(0.0, MAX_FRAME_MS);

        let mut due = 0;
        while self.accumulator >= self.interval_ms && due < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.interval_ms;
            due += 1;
        }
        if due == MAX_TICKS_PER_FRAME {
            // Drop the backlog instead of replaying it next frame
            self.accumulator = self.accumulator.min(self.interval_ms);
        }
        due
    }
}
