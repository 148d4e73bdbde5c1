use std::time::Duration;

use rand::Rng;

use crate::errors::ConfigError;

/// Wait applied before each item of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// The same wait before every item.
    Fixed(Duration),
    /// A wait drawn uniformly from `min..=max`, fresh for every item.
    Range { min: Duration, max: Duration },
}

impl Delay {
    pub const ZERO: Delay = Delay::Fixed(Duration::ZERO);

    /// A fixed delay given in seconds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDelay`] for negative or non-finite values.
    pub fn fixed_secs(secs: f64) -> Result<Self, ConfigError> {
        Ok(Delay::Fixed(secs_to_duration(secs)?))
    }

    /// A delay range given in seconds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidDelay`] for negative or non-finite bounds and
    /// [`ConfigError::InvertedRange`] when `min > max`.
    pub fn range_secs(min: f64, max: f64) -> Result<Self, ConfigError> {
        let (lo, hi) = (secs_to_duration(min)?, secs_to_duration(max)?);
        if lo > hi {
            return Err(ConfigError::InvertedRange { min, max });
        }
        Ok(Delay::Range { min: lo, max: hi })
    }

    /// Draws the wait for the next item.
    ///
    /// A range built with its bounds swapped is drawn from as if they were in
    /// order.
    pub fn next(&self) -> Duration {
        match *self {
            Delay::Fixed(d) => d,
            Delay::Range { min, max } => {
                let (lo, hi) = (min.min(max), min.max(max));
                if lo == hi {
                    return lo;
                }
                let secs = rand::thread_rng().gen_range(lo.as_secs_f64()..=hi.as_secs_f64());
                Duration::try_from_secs_f64(secs)
                    .unwrap_or(hi)
                    .clamp(lo, hi)
            }
        }
    }
}

impl Default for Delay {
    /// One second per item.
    fn default() -> Self {
        Delay::Fixed(Duration::from_secs(1))
    }
}

fn secs_to_duration(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDelay(secs))
}
