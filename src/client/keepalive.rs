// ABOUTME: SMPP keep-alive bookkeeping for the long-running transmitter session
// ABOUTME: Decides when the next enquire_link is due and when the link should be declared dead

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Configuration for periodic enquire_link PDUs.
///
/// ```rust
/// use smsgate::client::KeepAliveConfig;
/// use std::time::Duration;
///
/// let config = KeepAliveConfig::new(Duration::from_secs(60)).with_max_failures(5);
/// assert!(config.enabled);
/// assert!(!KeepAliveConfig::disabled().enabled);
/// ```
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Interval between enquire_link PDUs (default: 30 seconds)
    pub interval: Duration,

    /// Maximum consecutive failures before considering connection dead (default: 3)
    pub max_failures: u32,

    /// When false no enquire_link PDUs are sent automatically
    pub enabled: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_failures: 3,
            enabled: true,
        }
    }
}

impl KeepAliveConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// A budget of zero is raised to one
    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures.max(1);
        self
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Tracks enquire_link timing and failures for one session.
///
/// The session's background task polls it:
/// 1. sleep for `time_until_next_ping()`
/// 2. if `should_ping()`, send enquire_link and call `on_ping_sent()`
/// 3. report `on_ping_success()` or `on_ping_failure()`
/// 4. stop once `is_connection_failed()`
#[derive(Debug)]
pub struct KeepAliveManager {
    config: KeepAliveConfig,
    last_ping: Option<Instant>,
    started: Instant,
    consecutive_failures: u32,
    total_pings: u32,
    total_pongs: u32,
}

impl KeepAliveManager {
    pub fn new(config: KeepAliveConfig) -> Self {
        Self {
            config,
            last_ping: None,
            started: Instant::now(),
            consecutive_failures: 0,
            total_pings: 0,
            total_pongs: 0,
        }
    }

    /// True once a full interval has passed since the last ping (or since
    /// the session started) and the failure budget is not spent.
    pub fn should_ping(&self) -> bool {
        if !self.config.enabled {
            return false;
        }

        if self.is_connection_failed() {
            debug!("Max failures reached, not sending more pings");
            return false;
        }

        self.time_until_next_ping().is_zero()
    }

    /// Time left before the next ping is due
    pub fn time_until_next_ping(&self) -> Duration {
        let since = self.last_ping.unwrap_or(self.started);
        self.config.interval.saturating_sub(since.elapsed())
    }

    pub fn on_ping_sent(&mut self) {
        self.last_ping = Some(Instant::now());
        self.total_pings += 1;
        debug!(total = self.total_pings, "enquire_link sent");
    }

    pub fn on_ping_success(&mut self) {
        self.consecutive_failures = 0;
        self.total_pongs += 1;
        debug!(total = self.total_pongs, "enquire_link answered");
    }

    pub fn on_ping_failure(&mut self) {
        self.consecutive_failures += 1;
        warn!(
            consecutive_failures = self.consecutive_failures,
            max_failures = self.config.max_failures,
            "enquire_link failed"
        );
    }

    pub fn is_connection_failed(&self) -> bool {
        self.consecutive_failures >= self.config.max_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_alive_config_defaults() {
        let config = KeepAliveConfig::default();
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.max_failures, 3);
        assert!(config.enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_alive_manager_should_ping() {
        let mut manager = KeepAliveManager::new(KeepAliveConfig::new(Duration::from_secs(30)));

        // Not due until a full interval after start
        assert!(!manager.should_ping());
        assert_eq!(manager.time_until_next_ping(), Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(manager.should_ping());

        manager.on_ping_sent();
        assert!(!manager.should_ping());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(manager.time_until_next_ping(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_alive_failure_tracking() {
        let config = KeepAliveConfig::new(Duration::from_millis(100)).with_max_failures(3);
        let mut manager = KeepAliveManager::new(config);
        tokio::time::advance(Duration::from_millis(100)).await;

        manager.on_ping_failure();
        manager.on_ping_failure();
        assert!(!manager.is_connection_failed());
        assert!(manager.should_ping());

        manager.on_ping_failure();
        assert!(manager.is_connection_failed());
        assert!(!manager.should_ping());

        manager.on_ping_success();
        assert!(!manager.is_connection_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_alive_disabled() {
        let manager = KeepAliveManager::new(KeepAliveConfig::disabled());
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(!manager.should_ping());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_failure_budget_still_pings() {
        let config = KeepAliveConfig::new(Duration::from_secs(5)).with_max_failures(0);
        assert_eq!(config.max_failures, 1);

        let mut manager = KeepAliveManager::new(config);
        assert!(!manager.is_connection_failed());
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(manager.should_ping());

        manager.on_ping_sent();
        manager.on_ping_failure();
        assert!(manager.is_connection_failed());
        assert!(!manager.should_ping());
    }
}
