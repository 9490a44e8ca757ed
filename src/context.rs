//! Request-side inputs to config resolution and rule evaluation.

use crate::endpoint::EndpointKey;

/// Context of one in-flight client call, owned by the execution loop.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Target endpoint of the call.
    pub endpoint: EndpointKey,
    /// 1-based attempt counter (1 = first attempt), advanced by the
    /// execution loop.
    pub attempt: u32,
}

impl RequestContext {
    /// Context for a call about to make its first attempt.
    pub fn new(endpoint: EndpointKey) -> Self {
        Self {
            endpoint,
            attempt: 1,
        }
    }
}

/// The outgoing request as seen by config resolution.
#[derive(Debug, Clone)]
pub struct ClientRequest {
    /// HTTP method or RPC verb.
    pub method: String,
    /// Full request URL.
    pub url: String,
}

impl ClientRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }
}
