//! Per-request retry policy resolution for HTTP/RPC clients.
//!
//! This crate is the configuration layer of a retrying client: it validates
//! and normalizes a retry policy once, at client-build time, and makes it
//! available to the (external) attempt loop through a per-request
//! [`RetryConfigMapping`]. It does not issue requests, compute backoff, or
//! inspect responses itself; the [`rule`] module defines the interface the
//! rule-evaluation engine implements.
//!
//! ```
//! use std::time::Duration;
//! use retrymap::rule::{rule_fn, AttemptOutcome, RetryDecision};
//! use retrymap::{
//!     ClientRequest, EndpointKey, RequestContext, RetryConfig, RetryConfigMapping,
//! };
//!
//! let rule = rule_fn(|_ctx, outcome| match outcome {
//!     AttemptOutcome::Response(head) if head.status >= 500 => {
//!         RetryDecision::RetryAfter(Duration::from_millis(200))
//!     }
//!     _ => RetryDecision::NoRetry,
//! });
//!
//! let mut builder = RetryConfig::builder(rule);
//! builder.max_total_attempts(3)?;
//! let mapping = RetryConfigMapping::Static(builder);
//!
//! let ctx = RequestContext::new(EndpointKey::from_url("https://api.example.com/")?);
//! let req = ClientRequest::new("GET", "https://api.example.com/items");
//! let config = mapping.resolve(&ctx, &req)?.expect("retry configured");
//! assert_eq!(config.max_total_attempts(), 3);
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod context;
pub mod defaults;
pub mod endpoint;
pub mod error;
pub mod mapping;
pub mod rule;

pub use builder::RetryConfigBuilder;
pub use client::{MappedConfig, RetryingClientBuilder, StaticConfig};
pub use config::{RetryConfig, RuleKind};
pub use context::{ClientRequest, RequestContext};
pub use endpoint::EndpointKey;
pub use error::ConfigError;
pub use mapping::RetryConfigMapping;
