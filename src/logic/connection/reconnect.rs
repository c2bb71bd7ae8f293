//! Reconnection policy
//!
//! The manager never retries on its own; the session asks this policy what to
//! do after a close.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Stay closed until the session is torn down
    Manual,
    /// Re-open after `initial`, doubling up to `max`; reset after a successful open
    Backoff { initial: Duration, max: Duration },
}

#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    next: Option<Duration>,
    attempts: u32,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        let next = match policy {
            ReconnectPolicy::Manual => None,
            ReconnectPolicy::Backoff { initial, .. } => Some(initial),
        };
        Self { policy, next, attempts: 0 }
    }

    /// Delay before the next attempt, `None` when the policy never retries
    pub fn next_delay(&mut self) -> Option<Duration> {
        let ReconnectPolicy::Backoff { max, .. } = self.policy else {
            return None;
        };

        let delay = self.next?;
        self.attempts += 1;
        self.next = Some(delay.saturating_mul(2).min(max));
        Some(delay.min(max))
    }

    /// Called once a connection reached Open
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
