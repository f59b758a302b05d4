//! Randomized delay before scheduled posts.

use std::time::Duration;

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Normally distributed delay, resampled until non-negative.
///
/// Negative draws are thrown away rather than clamped to zero, so the
/// effective distribution is the right half of the normal, not a spike at 0.
#[derive(Debug, Clone, Copy)]
pub struct Jitter {
    seconds: Normal<f64>,
}

impl Jitter {
    pub const DEFAULT_MEAN: Duration = Duration::from_secs(12 * 3600);
    pub const DEFAULT_STD_DEV: Duration = Duration::from_secs(6 * 3600);

    pub fn new(mean: Duration, std_dev: Duration) -> anyhow::Result<Self> {
        let seconds = Normal::new(mean.as_secs_f64(), std_dev.as_secs_f64())?;
        Ok(Self { seconds })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        // mean >= 0, so each draw is accepted with probability >= 1/2
        loop {
            let secs = self.seconds.sample(rng);
            if secs >= 0.0 {
                // abs() folds -0.0
                return Duration::from_secs_f64(secs.abs());
            }
        }
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MEAN, Self::DEFAULT_STD_DEV)
            .expect("default jitter parameters are valid")
    }
}
