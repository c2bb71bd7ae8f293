//! Endpoint selection
//!
//! A known development host gets the unencrypted local endpoint; anything else
//! gets `wss://<page host><path>`. Decided once, at open time.

use serde::Serialize;

use super::ConnectionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub url: String,
    pub secure: bool,
}

impl Endpoint {
    /// Use an explicit URL as-is
    pub fn parse(url: &str) -> Result<Self, ConnectionError> {
        let url = url.trim();
        let secure = if url.starts_with("wss://") {
            true
        } else if url.starts_with("ws://") {
            false
        } else {
            return Err(ConnectionError::InvalidEndpoint(url.to_string()));
        };

        Ok(Self { url: url.to_string(), secure })
    }
}

/// Pick the endpoint for `page_host` (`host` or `host:port`)
pub fn select_endpoint(
    page_host: &str,
    dev_hosts: &[String],
    dev_endpoint: &str,
    stream_path: &str,
) -> Result<Endpoint, ConnectionError> {
    let page_host = page_host.trim();
    check_page_host(page_host)?;

    let hostname = hostname_of(page_host).to_lowercase();
    if dev_hosts.iter().any(|h| h.eq_ignore_ascii_case(&hostname)) {
        return Endpoint::parse(dev_endpoint);
    }

    let path = if stream_path.starts_with('/') {
        stream_path.to_string()
    } else {
        format!("/{}", stream_path)
    };

    Ok(Endpoint {
        url: format!("wss://{}{}", page_host, path),
        secure: true,
    })
}

/// A page host is a bare `host`, `host:port` or `[ipv6]:port`: no scheme, no
/// path, and IPv6 literals bracketed
pub fn check_page_host(host: &str) -> Result<(), ConnectionError> {
    let invalid =
        |why: &str| ConnectionError::InvalidEndpoint(format!("page host {:?} {}", host, why));

    if host.trim().is_empty() {
        return Err(ConnectionError::InvalidEndpoint("empty page host".to_string()));
    }
    if host.contains("://") || host.contains('/') {
        return Err(invalid("must not carry a scheme or path"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    if !host.starts_with('[') && host.matches(':').count() > 1 {
        return Err(invalid("is an IPv6 literal and must be bracketed"));
    }
    if hostname_of(host).is_empty() {
        return Err(invalid("has no hostname"));
    }
    Ok(())
}

/// Strip the port from `host:port`, keeping bracketed IPv6 literals intact
fn hostname_of(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}
