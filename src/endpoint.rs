use anyhow::{Context, Result};
use std::fmt;

/// Key identifying a request target for per-endpoint retry policy.
///
/// We intentionally normalise URLs down to `(scheme, host, port)` so that
/// different paths on the same origin resolve to the same retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl EndpointKey {
    /// Construct an endpoint key from a URL string.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed =
            url::Url::parse(url).with_context(|| format!("invalid URL for endpoint key: {url}"))?;

        let scheme = parsed.scheme().to_string();
        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL missing host for endpoint key: {url}"))?
            .to_string();
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| anyhow::anyhow!("URL missing port and unknown default: {url}"))?;

        Ok(Self {
            scheme,
            host,
            port,
        })
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}
