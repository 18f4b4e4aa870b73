use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_DNS_ADDR: &str = "172.20.0.2:53";
pub const DEFAULT_HTTP_ADDR: &str = "172.20.0.2:80";
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(3);

pub const ENV_ENABLED: &str = "OSSF_NETWORK_SIMULATION_ENABLED";
pub const ENV_DNS_ADDR: &str = "OSSF_INETSIM_DNS_ADDR";
pub const ENV_HTTP_ADDR: &str = "OSSF_INETSIM_HTTP_ADDR";
pub const ENV_LIVENESS_TIMEOUT: &str = "OSSF_URL_LIVENESS_TIMEOUT";

/// Settings for routing sandbox traffic to the simulated network.
///
/// Built once at startup and never mutated afterwards. The addresses are not
/// validated here; a bad one shows up in `validate_connection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub enabled: bool,
    /// Simulated DNS responder, `host:port`.
    pub dns_addr: String,
    /// Simulated HTTP responder, `host:port`.
    pub http_addr: String,
    /// Upper bound for every probe and for each leg of the connection check.
    pub liveness_timeout: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dns_addr: DEFAULT_DNS_ADDR.to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
        }
    }
}

impl SimulationConfig {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_dns_addr(mut self, addr: impl Into<String>) -> Self {
        self.dns_addr = addr.into();
        self
    }

    pub fn with_http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    pub fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    /// Applies every override that is present, leaving the other fields alone.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(enabled) = overrides.enabled {
            self.enabled = enabled;
        }
        if let Some(addr) = overrides.dns_addr {
            self.dns_addr = addr;
        }
        if let Some(addr) = overrides.http_addr {
            self.http_addr = addr;
        }
        if let Some(raw) = overrides.liveness_timeout_secs {
            match parse_timeout_secs(&raw) {
                Some(timeout) => self.liveness_timeout = timeout,
                None => debug!("Ignoring unparseable liveness timeout override: {:?}", raw),
            }
        }
        self
    }

    pub fn from_env() -> Self {
        Self::default().merge(ConfigOverrides::from_env())
    }
}

/// Sparse configuration input. `None` means "keep the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub enabled: Option<bool>,
    pub dns_addr: Option<String>,
    pub http_addr: Option<String>,
    /// Whole seconds, kept raw so that a bad value can be dropped on merge.
    pub liveness_timeout_secs: Option<String>,
}

impl ConfigOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            // Only an exact "true" switches simulation on; nothing here turns it off.
            enabled: get(ENV_ENABLED).filter(|v| v == "true").map(|_| true),
            dns_addr: get(ENV_DNS_ADDR),
            http_addr: get(ENV_HTTP_ADDR),
            liveness_timeout_secs: get(ENV_LIVENESS_TIMEOUT),
        }
    }

    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn or(self, other: ConfigOverrides) -> Self {
        Self {
            enabled: other.enabled.or(self.enabled),
            dns_addr: other.dns_addr.or(self.dns_addr),
            http_addr: other.http_addr.or(self.http_addr),
            liveness_timeout_secs: other.liveness_timeout_secs.or(self.liveness_timeout_secs),
        }
    }
}

/// Zero is rejected along with garbage: a zero timeout would fail every probe.
fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    raw.parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
