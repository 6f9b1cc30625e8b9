use std::time::Duration;
use rand::Rng;

/// Exponentially distributed gaps between launches, i.e. a Poisson
/// arrival process with rate `1 / mean`.
pub struct Arrivals<R: Rng> {
    mean: f64,
    rng: R,
}

impl<R: Rng> Arrivals<R> {
    pub fn new(mean: f64, rng: R) -> Self {
        Arrivals { mean, rng }
    }

    /// Seconds until the next launch, always finite and non-negative.
    pub fn next_delay(&mut self) -> f64 {
        // gen() is in [0, 1), so the ratio is in [1, 2^53] and the log never goes negative
        let u: f64 = self.rng.gen();
        self.mean * (1.0 / (1.0 - u)).ln()
    }
}

pub fn to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}
