// Liveness probes. Neither probe returns an error: anything that goes wrong
// just means "not alive".

use super::{Bounded, NetworkSimulator};
use std::net::IpAddr;
use tracing::{debug, info, warn};
use url::Url;

impl NetworkSimulator {
    /// HEAD `url` without following redirects.
    ///
    /// Any status in `200..400` counts as alive. With simulation off this is
    /// always true and no request is made.
    pub async fn is_url_alive(&self, url: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        info!(url, "Checking URL liveness");

        let target = match Url::parse(url) {
            Ok(target) => target,
            Err(e) => {
                warn!(url, error = %e, "Failed to create request for URL liveness check");
                return false;
            }
        };

        match self.bounded(self.probe_client.head(target).send()).await {
            Bounded::Done(Ok(response)) => {
                let status = response.status().as_u16();
                let alive = (200..400).contains(&status);
                info!(url, status_code = status, is_alive = alive, "URL liveness check result");
                alive
            }
            Bounded::Done(Err(e)) => {
                info!(url, error = %e, "URL is not alive");
                false
            }
            Bounded::TimedOut => {
                info!(url, timeout = ?self.config.liveness_timeout, "URL liveness check timed out");
                false
            }
            Bounded::Cancelled => {
                debug!(url, "URL liveness check cancelled");
                false
            }
        }
    }

    /// True when `host` resolves to at least one address.
    pub async fn is_host_alive(&self, host: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        info!(host, "Checking host DNS resolution");

        if host.is_empty() {
            info!("Host DNS resolution failed: empty host");
            return false;
        }

        match self.bounded(tokio::net::lookup_host((host, 0))).await {
            Bounded::Done(Ok(addrs)) => {
                let ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
                if ips.is_empty() {
                    info!(host, "Host DNS resolution returned no addresses");
                    return false;
                }
                info!(host, ?ips, "Host resolved successfully");
                true
            }
            Bounded::Done(Err(e)) => {
                info!(host, error = %e, "Host DNS resolution failed");
                false
            }
            Bounded::TimedOut => {
                info!(host, timeout = ?self.config.liveness_timeout, "Host DNS resolution timed out");
                false
            }
            Bounded::Cancelled => {
                debug!(host, "Host DNS resolution cancelled");
                false
            }
        }
    }
}
