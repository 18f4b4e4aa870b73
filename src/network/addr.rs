use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddrError {
    #[error("missing port in address {0:?}")]
    MissingPort(String),
    #[error("too many colons in address {0:?}")]
    TooManyColons(String),
    #[error("missing ']' in address {0:?}")]
    MissingBracket(String),
    #[error("unexpected '[' or ']' in address {0:?}")]
    UnexpectedBracket(String),
    #[error("invalid port {port:?} in address {addr:?}")]
    InvalidPort { addr: String, port: String },
}

/// Splits `host:port` or `[host]:port` into its parts.
///
/// Brackets are stripped from IPv6 hosts. The port is returned as written and
/// may be empty; use [`parse_host_port`] when a numeric port is required.
pub fn split_host_port(addr: &str) -> Result<(&str, &str), AddrError> {
    let Some(colon) = addr.rfind(':') else {
        return Err(AddrError::MissingPort(addr.to_string()));
    };

    let (host, rest) = if let Some(inner) = addr.strip_prefix('[') {
        let Some(end) = inner.find(']') else {
            return Err(AddrError::MissingBracket(addr.to_string()));
        };
        // "]" must be followed directly by the last colon
        if end + 2 != colon {
            return if end + 2 == addr.len() {
                Err(AddrError::MissingPort(addr.to_string()))
            } else if addr[end + 2..].starts_with(':') {
                Err(AddrError::TooManyColons(addr.to_string()))
            } else {
                Err(AddrError::MissingPort(addr.to_string()))
            };
        }
        (&inner[..end], &addr[colon + 1..])
    } else {
        let host = &addr[..colon];
        if host.contains(':') {
            return Err(AddrError::TooManyColons(addr.to_string()));
        }
        (host, &addr[colon + 1..])
    };

    if host.contains(['[', ']']) || rest.contains(['[', ']']) {
        return Err(AddrError::UnexpectedBracket(addr.to_string()));
    }

    Ok((host, rest))
}

/// Like [`split_host_port`] but also requires a valid numeric port.
pub fn parse_host_port(addr: &str) -> Result<(&str, u16), AddrError> {
    let (host, port) = split_host_port(addr)?;
    let port = port.parse::<u16>().map_err(|_| AddrError::InvalidPort {
        addr: addr.to_string(),
        port: port.to_string(),
    })?;
    Ok((host, port))
}
