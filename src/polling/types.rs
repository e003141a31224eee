//! Poll policy and terminal state vocabulary

use crate::error::{Error, Result};
use std::time::Duration;

/// Status values after which a long-running operation never changes again
pub const TERMINAL_STATES: [&str; 5] = ["completed", "canceled", "cancelled", "failed", "succeeded"];

/// Check a status string against the shared terminal vocabulary (case-insensitive)
pub fn is_terminal_state(status: &str) -> bool {
    TERMINAL_STATES
        .iter()
        .any(|state| state.eq_ignore_ascii_case(status))
}

/// Like [`is_terminal_state`], also accepting resource-specific terminal values
///
/// Compute clusters, for example, treat a steady allocation state as done.
pub fn is_terminal_state_with(status: &str, extra: &[&str]) -> bool {
    is_terminal_state(status) || extra.iter().any(|state| state.eq_ignore_ascii_case(status))
}

/// Backoff schedule and timeout for waiting on a long-running operation
///
/// Fields are private: every setter validates the candidate policy as a whole
/// and leaves `self` untouched when the result would be invalid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    initial_interval: Duration,
    max_interval: Duration,
    growth_multiplier: f64,
    timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(90),
            growth_multiplier: 1.5,
            timeout: Duration::MAX,
        }
    }
}

impl PollPolicy {
    /// Create a validated policy
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        growth_multiplier: f64,
        timeout: Duration,
    ) -> Result<Self> {
        let policy = Self {
            initial_interval,
            max_interval,
            growth_multiplier,
            timeout,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Fixed-rate polling (growth multiplier of 1.0)
    ///
    /// The ceiling is set just above `interval` so the invariant
    /// `initial < max` holds; the schedule never grows past `interval`.
    pub fn fixed(interval: Duration, timeout: Duration) -> Result<Self> {
        let ceiling = interval
            .checked_add(Duration::from_millis(1))
            .ok_or_else(|| Error::invalid_policy("initial_interval", "too large for fixed-rate polling"))?;
        Self::new(interval, ceiling, 1.0, timeout)
    }

    /// First sleep interval
    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    /// Ceiling for the sleep interval
    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    /// Factor applied to the interval after every iteration
    pub fn growth_multiplier(&self) -> f64 {
        self.growth_multiplier
    }

    /// Overall wall-clock budget (`Duration::MAX` when unbounded)
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Set the initial interval
    pub fn set_initial_interval(&mut self, value: Duration) -> Result<()> {
        self.commit(Self {
            initial_interval: value,
            ..*self
        })
    }

    /// Set the maximum interval
    pub fn set_max_interval(&mut self, value: Duration) -> Result<()> {
        self.commit(Self {
            max_interval: value,
            ..*self
        })
    }

    /// Set the growth multiplier
    pub fn set_growth_multiplier(&mut self, value: f64) -> Result<()> {
        self.commit(Self {
            growth_multiplier: value,
            ..*self
        })
    }

    /// Set the overall timeout
    pub fn set_timeout(&mut self, value: Duration) -> Result<()> {
        self.commit(Self {
            timeout: value,
            ..*self
        })
    }

    /// Builder-style variant of [`Self::set_initial_interval`]
    pub fn with_initial_interval(mut self, value: Duration) -> Result<Self> {
        self.set_initial_interval(value)?;
        Ok(self)
    }

    /// Builder-style variant of [`Self::set_max_interval`]
    pub fn with_max_interval(mut self, value: Duration) -> Result<Self> {
        self.set_max_interval(value)?;
        Ok(self)
    }

    /// Builder-style variant of [`Self::set_growth_multiplier`]
    pub fn with_growth_multiplier(mut self, value: f64) -> Result<Self> {
        self.set_growth_multiplier(value)?;
        Ok(self)
    }

    /// Builder-style variant of [`Self::set_timeout`]
    pub fn with_timeout(mut self, value: Duration) -> Result<Self> {
        self.set_timeout(value)?;
        Ok(self)
    }

    /// Check the joint invariant of all four fields
    pub fn validate(&self) -> Result<()> {
        if self.initial_interval.is_zero() {
            return Err(Error::invalid_policy(
                "initial_interval",
                "must be positive",
            ));
        }
        if self.initial_interval >= self.max_interval {
            return Err(Error::invalid_policy(
                "initial_interval",
                format!(
                    "must be less than max_interval ({:.3}s), got {:.3}s",
                    self.max_interval.as_secs_f64(),
                    self.initial_interval.as_secs_f64()
                ),
            ));
        }
        if !self.growth_multiplier.is_finite() || self.growth_multiplier < 1.0 {
            return Err(Error::invalid_policy(
                "growth_multiplier",
                format!("must be >= 1.0, got {}", self.growth_multiplier),
            ));
        }
        if self.timeout <= self.initial_interval {
            return Err(Error::invalid_policy(
                "timeout",
                format!(
                    "must be longer than initial_interval ({:.3}s)",
                    self.initial_interval.as_secs_f64()
                ),
            ));
        }
        Ok(())
    }

    /// Interval that follows `current` in the schedule
    pub fn next_interval(&self, current: Duration) -> Duration {
        let grown = current.as_secs_f64() * self.growth_multiplier;
        if grown >= self.max_interval.as_secs_f64() {
            self.max_interval
        } else {
            Duration::from_secs_f64(grown)
        }
    }

    /// The (infinite) sequence of sleep intervals this policy produces
    pub fn intervals(&self) -> Intervals {
        Intervals {
            policy: *self,
            current: self.initial_interval,
        }
    }

    fn commit(&mut self, candidate: Self) -> Result<()> {
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
}

/// Iterator over a policy's sleep intervals
#[derive(Debug, Clone)]
pub struct Intervals {
    policy: PollPolicy,
    current: Duration,
}

impl Iterator for Intervals {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let interval = self.current;
        self.current = self.policy.next_interval(interval);
        Some(interval)
    }
}
