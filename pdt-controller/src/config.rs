//! Wait configuration
//!
//! Defines how the controller polls a job while waiting for it: the delay
//! between status checks and an optional overall deadline.

use std::time::Duration;

use pdt_client::parse_bool;

/// How long to sleep between status checks unless configured otherwise
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Wait configuration
///
/// Without a `timeout` the wait is unbounded and ends only when the service
/// reports a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between status checks. Zero polls back to back.
    pub poll_interval: Duration,

    /// Give up after this long without a terminal status
    pub timeout: Option<Duration>,

    /// Ask the service to stop the build when the timeout fires
    pub stop_on_timeout: bool,
}

impl WaitConfig {
    /// Creates an unbounded configuration with the given poll interval
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            timeout: None,
            stop_on_timeout: true,
        }
    }

    /// Loads configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PDT_POLL_INTERVAL (optional, seconds, default: 10)
    /// - PDT_WAIT_TIMEOUT (optional, seconds, default: unbounded)
    /// - PDT_STOP_ON_TIMEOUT (optional, default: true)
    ///
    /// Malformed values are errors. The result is not validated, so callers
    /// can apply their own overrides before calling [`validate`](Self::validate).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seconds = |name: &str| -> anyhow::Result<Option<Duration>> {
            lookup(name)
                .map(|raw| {
                    raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                        anyhow::anyhow!("{} must be a number of seconds, got `{}`", name, raw)
                    })
                })
                .transpose()
        };

        let poll_interval = seconds("PDT_POLL_INTERVAL")?.unwrap_or(DEFAULT_POLL_INTERVAL);
        let timeout = seconds("PDT_WAIT_TIMEOUT")?;

        let stop_on_timeout = match lookup("PDT_STOP_ON_TIMEOUT") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                anyhow::anyhow!("PDT_STOP_ON_TIMEOUT must be a boolean, got `{}`", raw)
            })?,
            None => true,
        };

        Ok(Self {
            poll_interval,
            timeout,
            stop_on_timeout,
        })
    }

    /// Sets an overall deadline for the wait
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_stop_on_timeout(mut self, stop_on_timeout: bool) -> Self {
        self.stop_on_timeout = stop_on_timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            anyhow::bail!("timeout must be greater than 0 when set");
        }

        if let Some(timeout) = self.timeout {
            if !self.poll_interval.is_zero() && timeout < self.poll_interval {
                anyhow::bail!(
                    "timeout ({:?}) is shorter than poll_interval ({:?})",
                    timeout,
                    self.poll_interval
                );
            }
        }

        Ok(())
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = WaitConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.timeout, None);
        assert!(config.stop_on_timeout);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_poll_interval_is_valid() {
        let config = WaitConfig::new(Duration::ZERO).with_timeout(Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = WaitConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WaitConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = WaitConfig::from_lookup(lookup(&[
            ("PDT_POLL_INTERVAL", "0"),
            ("PDT_WAIT_TIMEOUT", "90"),
            ("PDT_STOP_ON_TIMEOUT", "false"),
        ]))
        .unwrap();
        assert_eq!(config.poll_interval, Duration::ZERO);
        assert_eq!(config.timeout, Some(Duration::from_secs(90)));
        assert!(!config.stop_on_timeout);
    }

    #[test]
    fn test_stop_on_timeout_accepts_zero_and_no() {
        for raw in ["0", "no", "NO", "off"] {
            let config =
                WaitConfig::from_lookup(lookup(&[("PDT_STOP_ON_TIMEOUT", raw)])).unwrap();
            assert!(!config.stop_on_timeout, "{} should disable stopping", raw);
        }

        let config = WaitConfig::from_lookup(lookup(&[("PDT_STOP_ON_TIMEOUT", "1")])).unwrap();
        assert!(config.stop_on_timeout);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(WaitConfig::from_lookup(lookup(&[("PDT_STOP_ON_TIMEOUT", "maybe")])).is_err());
        assert!(WaitConfig::from_lookup(lookup(&[("PDT_POLL_INTERVAL", "5s")])).is_err());
        assert!(WaitConfig::from_lookup(lookup(&[("PDT_WAIT_TIMEOUT", "-1")])).is_err());
    }

    #[test]
    fn test_loading_does_not_validate() {
        // A short timeout against the default interval is only invalid until
        // the caller shortens the interval.
        let mut config = WaitConfig::from_lookup(lookup(&[("PDT_WAIT_TIMEOUT", "5")])).unwrap();
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_secs(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = WaitConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = WaitConfig::new(Duration::from_secs(30)).with_timeout(Duration::from_secs(5));
        assert!(config.validate().is_err());

        let config = WaitConfig::new(Duration::from_secs(5))
            .with_timeout(Duration::from_secs(600))
            .with_stop_on_timeout(false);
        assert!(config.validate().is_ok());
        assert!(!config.stop_on_timeout);
    }
}
