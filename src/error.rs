use crate::network::AddrError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Which half of the simulator connection check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Dns,
    Http,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Dns => f.write_str("DNS"),
            Leg::Http => f.write_str("HTTP"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid INetSim DNS address: {0}")]
    InvalidDnsAddress(#[source] AddrError),

    #[error("failed to connect to INetSim DNS at {addr}: {source}")]
    DnsUnreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid INetSim HTTP address {addr:?}: {source}")]
    InvalidHttpAddress {
        addr: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to connect to INetSim HTTP at {url}: {source}")]
    HttpUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("INetSim {leg} check timed out after {timeout:?}")]
    Timeout { leg: Leg, timeout: Duration },

    #[error("INetSim {leg} check cancelled")]
    Cancelled { leg: Leg },
}

impl ValidationError {
    pub fn leg(&self) -> Leg {
        match self {
            Self::InvalidDnsAddress(_) | Self::DnsUnreachable { .. } => Leg::Dns,
            Self::InvalidHttpAddress { .. } | Self::HttpUnreachable { .. } => Leg::Http,
            Self::Timeout { leg, .. } | Self::Cancelled { leg } => *leg,
        }
    }
}
