//! Per-request retry config resolution.
//!
//! A mapping decouples how retry is configured from when it is decided: at
//! request time the execution loop asks the mapping for the config to use,
//! and `Ok(None)` means "do not retry this request", a distinct outcome
//! rather than a failure.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::builder::RetryConfigBuilder;
use crate::config::RetryConfig;
use crate::context::{ClientRequest, RequestContext};
use crate::error::ConfigError;

/// Resolver function held by [`RetryConfigMapping::Dynamic`].
pub type ResolveFn =
    dyn Fn(&RequestContext, &ClientRequest) -> Option<RetryConfig> + Send + Sync;

/// Resolves the retry config for an outgoing request.
///
/// Constructed once at client-build time and then only read, possibly from
/// many request flows at once. Resolution performs no I/O.
pub enum RetryConfigMapping {
    /// One staged builder shared by every request. `resolve` re-invokes
    /// [`RetryConfigBuilder::build`] on each call: the staged values stay
    /// the single source of truth, with no built cache that could go stale
    /// if a setter ran after go-live.
    Static(RetryConfigBuilder),
    /// Externally supplied resolver, e.g. per-route. Must be safe to call
    /// concurrently and must not block; it sits on the request hot path.
    Dynamic(Arc<ResolveFn>),
}

impl RetryConfigMapping {
    /// Wraps an externally supplied resolver function.
    pub fn of<F>(f: F) -> Self
    where
        F: Fn(&RequestContext, &ClientRequest) -> Option<RetryConfig> + Send + Sync + 'static,
    {
        RetryConfigMapping::Dynamic(Arc::new(f))
    }

    /// Builds configs per string key, at most once per key.
    ///
    /// `key_fn` names the group a request belongs to; `config_fn` builds the
    /// config the first time a key is seen. Results are cached for the
    /// lifetime of the mapping, including `None` ("never retry this group").
    pub fn keyed<K, C>(key_fn: K, config_fn: C) -> Self
    where
        K: Fn(&RequestContext, &ClientRequest) -> String + Send + Sync + 'static,
        C: Fn(&RequestContext, &ClientRequest) -> Option<RetryConfig> + Send + Sync + 'static,
    {
        let cache: RwLock<HashMap<String, Option<RetryConfig>>> = RwLock::new(HashMap::new());
        Self::of(move |ctx, req| {
            let key = key_fn(ctx, req);
            if let Some(found) = cache.read().unwrap().get(&key) {
                return found.clone();
            }

            // Build outside the write lock; under a race the first insert
            // wins and every caller sees the same config.
            let built = config_fn(ctx, req);
            tracing::debug!("materialized retry config for key {}", key);
            cache.write().unwrap().entry(key).or_insert(built).clone()
        })
    }

    /// Keyed mapping grouped by the request's endpoint
    /// (`scheme://host:port`).
    pub fn per_endpoint<C>(config_fn: C) -> Self
    where
        C: Fn(&RequestContext, &ClientRequest) -> Option<RetryConfig> + Send + Sync + 'static,
    {
        Self::keyed(|ctx, _req| ctx.endpoint.to_string(), config_fn)
    }

    /// Resolves the config for the given request.
    ///
    /// `Ok(None)` means retries are not configured for this request. The
    /// static branch re-validates the staged builder values, so it can only
    /// fail by reproducing a [`ConfigError`] a setter already reported;
    /// dynamic resolution is infallible.
    pub fn resolve(
        &self,
        ctx: &RequestContext,
        req: &ClientRequest,
    ) -> Result<Option<RetryConfig>, ConfigError> {
        match self {
            RetryConfigMapping::Static(builder) => builder.build().map(Some),
            RetryConfigMapping::Dynamic(f) => Ok(f(ctx, req)),
        }
    }
}

impl fmt::Debug for RetryConfigMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryConfigMapping::Static(builder) => {
                f.debug_tuple("Static").field(builder).finish()
            }
            RetryConfigMapping::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
