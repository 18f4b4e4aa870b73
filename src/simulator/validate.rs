use super::{Bounded, NetworkSimulator};
use crate::error::{Leg, ValidationError};
use crate::network::parse_host_port;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, info};
use url::Url;

impl NetworkSimulator {
    /// Startup health check against the INetSim appliance.
    ///
    /// Checks the DNS address at the transport level (UDP connect, no query)
    /// and then issues `GET /` to the HTTP address. The first failing leg is
    /// returned. A no-op when simulation is disabled.
    pub async fn validate_connection(&self) -> Result<(), ValidationError> {
        if !self.config.enabled {
            return Ok(());
        }

        info!("Validating INetSim connection");

        self.check_dns().await?;
        self.check_http().await?;

        info!(
            dns = %self.config.dns_addr,
            http = %self.config.http_addr,
            "INetSim connection validated successfully"
        );
        Ok(())
    }

    async fn check_dns(&self) -> Result<(), ValidationError> {
        let addr = &self.config.dns_addr;
        let (host, port) = parse_host_port(addr).map_err(ValidationError::InvalidDnsAddress)?;

        let connect = async {
            let target = tokio::net::lookup_host((host, port))
                .await?
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses returned"))?;

            let local: SocketAddr = if target.is_ipv4() {
                (Ipv4Addr::UNSPECIFIED, 0).into()
            } else {
                (Ipv6Addr::UNSPECIFIED, 0).into()
            };
            let socket = UdpSocket::bind(local).await?;
            socket.connect(target).await?;
            Ok::<_, io::Error>(target)
        };

        match self.bounded(connect).await {
            Bounded::Done(Ok(target)) => {
                debug!(%target, "INetSim DNS reachable");
                Ok(())
            }
            Bounded::Done(Err(source)) => Err(ValidationError::DnsUnreachable {
                addr: addr.clone(),
                source,
            }),
            Bounded::TimedOut => Err(ValidationError::Timeout {
                leg: Leg::Dns,
                timeout: self.config.liveness_timeout,
            }),
            Bounded::Cancelled => Err(ValidationError::Cancelled { leg: Leg::Dns }),
        }
    }

    async fn check_http(&self) -> Result<(), ValidationError> {
        let url = format!("http://{}/", self.config.http_addr);
        let target = Url::parse(&url).map_err(|source| ValidationError::InvalidHttpAddress {
            addr: self.config.http_addr.clone(),
            source,
        })?;

        match self.bounded(self.check_client.get(target).send()).await {
            // any answer at all means the responder is up
            Bounded::Done(Ok(response)) => {
                debug!(status = response.status().as_u16(), "INetSim HTTP reachable");
                Ok(())
            }
            Bounded::Done(Err(source)) => Err(ValidationError::HttpUnreachable { url, source }),
            Bounded::TimedOut => Err(ValidationError::Timeout {
                leg: Leg::Http,
                timeout: self.config.liveness_timeout,
            }),
            Bounded::Cancelled => Err(ValidationError::Cancelled { leg: Leg::Http }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{Leg, ValidationError};
    use crate::simulator::test_support::{closed_port, spawn_http_server, spawn_silent_server};
    use crate::simulator::{NetworkSimulator, SimulationConfig};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn enabled(dns: &str, http: &str) -> NetworkSimulator {
        NetworkSimulator::new(
            SimulationConfig::default()
                .enabled(true)
                .with_dns_addr(dns)
                .with_http_addr(http)
                .with_liveness_timeout(Duration::from_secs(2)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn disabled_is_ok() {
        let ns = NetworkSimulator::new(
            SimulationConfig::default().with_dns_addr("garbage").with_http_addr("garbage"),
        )
        .unwrap();
        assert!(ns.validate_connection().await.is_ok());
    }

    #[tokio::test]
    async fn reachable_simulator_passes() {
        // an error status is still an answer
        let http = spawn_http_server(500, "").await;
        let ns = enabled("127.0.0.1:53", &http.to_string());
        ns.validate_connection().await.unwrap();
    }

    #[tokio::test]
    async fn malformed_dns_addr_fails_dns_leg() {
        let http = spawn_http_server(200, "").await;
        let ns = enabled("172.20.0.2", &http.to_string());

        let err = ns.validate_connection().await.unwrap_err();
        assert_eq!(err.leg(), Leg::Dns);
        assert!(matches!(err, ValidationError::InvalidDnsAddress(_)));
        assert!(err.to_string().contains("DNS"));
    }

    #[tokio::test]
    async fn unresolvable_dns_host_fails_dns_leg() {
        let http = spawn_http_server(200, "").await;
        let ns = enabled("inetsim.invalid:53", &http.to_string());

        let err = ns.validate_connection().await.unwrap_err();
        assert_eq!(err.leg(), Leg::Dns);
    }

    #[tokio::test]
    async fn unreachable_http_fails_http_leg() {
        let closed = closed_port().await;
        let ns = enabled("127.0.0.1:53", &closed.to_string());

        let err = ns.validate_connection().await.unwrap_err();
        assert_eq!(err.leg(), Leg::Http);
        assert!(matches!(err, ValidationError::HttpUnreachable { .. }));
        assert!(err.to_string().contains("HTTP"));
    }

    #[tokio::test]
    async fn silent_http_times_out() {
        let silent = spawn_silent_server().await;
        let ns = NetworkSimulator::new(
            SimulationConfig::default()
                .enabled(true)
                .with_dns_addr("127.0.0.1:53")
                .with_http_addr(silent.to_string())
                .with_liveness_timeout(Duration::from_millis(300)),
        )
        .unwrap();

        let err = ns.validate_connection().await.unwrap_err();
        assert_eq!(err.leg(), Leg::Http);
    }

    #[tokio::test]
    async fn cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let ns = enabled("127.0.0.1:53", "127.0.0.1:80").with_shutdown(token);

        let err = ns.validate_connection().await.unwrap_err();
        assert!(matches!(err, ValidationError::Cancelled { leg: Leg::Dns }));
    }
}
