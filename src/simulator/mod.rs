pub mod config;
mod probe;
mod validate;

pub use config::{ConfigOverrides, SimulationConfig};

use crate::error::Result;
use crate::network::{PUBLIC_DNS_SERVERS, split_host_port};
use crate::stats::Stats;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Decides whether sandbox traffic goes to the real network or to INetSim.
///
/// Holds no mutable state: every method reads the shared config and does its
/// own network I/O, so one instance can be cloned into any number of tasks.
/// All network calls are bounded by `liveness_timeout` and abort as soon as
/// the shutdown token is cancelled.
#[derive(Debug, Clone)]
pub struct NetworkSimulator {
    config: Arc<SimulationConfig>,
    // HEAD probes; redirects are reported, never followed
    probe_client: reqwest::Client,
    check_client: reqwest::Client,
    shutdown: CancellationToken,
}

enum Bounded<T> {
    Done(T),
    TimedOut,
    Cancelled,
}

impl NetworkSimulator {
    pub fn new(config: impl Into<Arc<SimulationConfig>>) -> Result<Self> {
        let config = config.into();

        let probe_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.liveness_timeout)
            .no_proxy()
            .build()?;

        let check_client = reqwest::Client::builder()
            .timeout(config.liveness_timeout)
            .no_proxy()
            .build()?;

        debug!(
            enabled = config.enabled,
            dns = %config.dns_addr,
            http = %config.http_addr,
            timeout = ?config.liveness_timeout,
            "Network simulator created"
        );

        Ok(Self {
            config,
            probe_client,
            check_client,
            shutdown: CancellationToken::new(),
        })
    }

    /// A missing config means simulation is off.
    pub fn from_optional(config: Option<SimulationConfig>) -> Result<Self> {
        Self::new(config.unwrap_or_default())
    }

    /// Ties in-flight probes to a worker-level shutdown token.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn dns_addr(&self) -> &str {
        &self.config.dns_addr
    }

    pub fn http_addr(&self) -> &str {
        &self.config.http_addr
    }

    /// True when `url` should be answered by INetSim instead of the real host.
    pub async fn should_redirect(&self, url: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let redirect = !self.is_url_alive(url).await;
        if redirect {
            info!(url, inetsim_http = %self.config.http_addr, "URL will be redirected to INetSim");
        }
        redirect
    }

    /// Resolvers for the sandbox's network namespace.
    ///
    /// With simulation on this is the INetSim DNS host without its port. An
    /// address that doesn't split is passed through untouched.
    pub fn dns_servers(&self) -> Vec<String> {
        if !self.config.enabled {
            return PUBLIC_DNS_SERVERS.iter().map(|s| s.to_string()).collect();
        }

        match split_host_port(&self.config.dns_addr) {
            Ok((host, _)) => vec![host.to_string()],
            Err(e) => {
                debug!("Using raw INetSim DNS address: {}", e);
                vec![self.config.dns_addr.clone()]
            }
        }
    }

    pub fn stats(&self) -> Stats {
        Stats::default()
    }

    async fn bounded<F: Future>(&self, fut: F) -> Bounded<F::Output> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Bounded::Cancelled,
            res = tokio::time::timeout(self.config.liveness_timeout, fut) => match res {
                Ok(output) => Bounded::Done(output),
                Err(_) => Bounded::TimedOut,
            },
        }
    }
}
