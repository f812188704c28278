use std::time::Duration;

use crate::config::RemoteSettings;

/// Fixed-delay reconnect policy with a ceiling on consecutive failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &RemoteSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            delay: Duration::from_millis(settings.retry_delay_ms),
        }
    }

    /// Delay before the next attempt after `failures` consecutive failed
    /// connections, or `None` once the ceiling is reached.
    pub fn next_delay(&self, failures: u32) -> Option<Duration> {
        (failures < self.max_attempts).then_some(self.delay)
    }
}
