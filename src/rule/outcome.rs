//! Attempt outcome types handed to rule evaluation.

use thiserror::Error;

/// Trailing metadata delivered after the response body.
pub type Trailers = Vec<(String, String)>;

/// Status and headers of a completed response, before any body is read.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    /// HTTP status code (or mapped RPC status).
    pub status: u16,
    /// Header name/value pairs in wire order.
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport-level failure of a single attempt (no response was produced).
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Attempt timed out (connect/read, or the per-attempt response timeout).
    #[error("attempt timed out")]
    Timeout,
    /// Network-level failure (connection reset, DNS, etc.).
    #[error("connection failed: {0}")]
    Connection(String),
    /// Attempt was aborted by the caller.
    #[error("attempt aborted")]
    Aborted,
}

/// What a single attempt produced: a response head or a transport failure.
#[derive(Debug, Clone, Copy)]
pub enum AttemptOutcome<'a> {
    /// The server produced a response; the body may not have been read yet.
    Response(&'a ResponseHead),
    /// The attempt failed before a response arrived.
    Failed(&'a AttemptError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut head = ResponseHead::new(503);
        head.headers
            .push(("Retry-After".to_string(), "2".to_string()));
        assert_eq!(head.header("retry-after"), Some("2"));
        assert_eq!(head.header("RETRY-AFTER"), Some("2"));
        assert_eq!(head.header("content-type"), None);
    }
}
