use std::thread;
use std::time::Duration;

const MICROS_PER_SEC: f64 = 1_000_000.0;

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Whole microseconds, truncated. The float-to-int cast saturates, so
/// negative and NaN inputs come out as zero and huge ones as `u64::MAX`.
pub fn from_seconds(seconds: f64) -> Duration {
    Duration::from_micros((seconds * MICROS_PER_SEC) as u64)
}
