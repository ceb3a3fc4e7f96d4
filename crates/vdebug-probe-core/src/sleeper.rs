//! Pauses between editor requests.
//!
//! The settle delay after starting a session and the gaps between readiness
//! polls go through [`Sleeper`], so tests can record them instead of waiting.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use vdebug_probe_common::mutex_lock_or_recover;

pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread with `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSleeper;

impl Sleeper for RealSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Records every requested pause and returns immediately.
#[derive(Debug, Default)]
pub struct MockSleeper {
    durations: Mutex<Vec<Duration>>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        mutex_lock_or_recover(&self.durations).len()
    }

    pub fn total_duration(&self) -> Duration {
        mutex_lock_or_recover(&self.durations).iter().sum()
    }

    pub fn durations(&self) -> Vec<Duration> {
        mutex_lock_or_recover(&self.durations).clone()
    }

    pub fn reset(&self) {
        mutex_lock_or_recover(&self.durations).clear();
    }
}

impl Sleeper for MockSleeper {
    fn sleep(&self, duration: Duration) {
        mutex_lock_or_recover(&self.durations).push(duration);
    }
}
