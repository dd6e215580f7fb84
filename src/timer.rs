#![warn(clippy::all, clippy::pedantic)]

use std::time::{Duration, Instant};

/// Repeating timer driven by the main loop. It never fires on its own; the
/// loop polls it with the current instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropTimer {
    next_fire: Option<Instant>,
}

impl DropTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to fire `first_delay` from `now`. Restarting a running
    /// timer moves its deadline.
    pub fn start(&mut self, now: Instant, first_delay: Duration) {
        self.next_fire = Some(now + first_delay);
    }

    pub fn stop(&mut self) {
        self.next_fire = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Fires at most once per call. When due, the next deadline becomes
    /// `now + interval`.
    pub fn poll(&mut self, now: Instant, interval: Duration) -> bool {
        match self.next_fire {
            Some(deadline) if now >= deadline => {
                self.next_fire = Some(now + interval);
                true
            }
            _ => false,
        }
    }
}
