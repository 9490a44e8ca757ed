//! Client-builder integration: static vs mapped retry configuration.
//!
//! A retrying client is configured in exactly one of two modes, fixed when
//! the builder is created: static (one staged [`RetryConfigBuilder`] whose
//! scalar setters are exposed here) or mapped (per-request resolution is
//! owned by an externally supplied [`RetryConfigMapping`], where a single
//! scalar override would be ambiguous across routes).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::builder::RetryConfigBuilder;
use crate::config::RetryConfig;
use crate::error::ConfigError;
use crate::mapping::RetryConfigMapping;
use crate::rule::{RetryRule, RetryRuleWithContent};

/// Mode state: the builder stages one config shared by every request.
pub struct StaticConfig {
    config: RetryConfigBuilder,
}

/// Mode state: per-request resolution is delegated to a mapping.
pub struct MappedConfig {
    mapping: RetryConfigMapping,
}

/// Builds the retry layer of a client.
///
/// The type parameter records the configuration mode, so using a setter in
/// the wrong mode is a compile error rather than a runtime condition:
///
/// ```compile_fail
/// use retrymap::{RetryConfigMapping, RetryingClientBuilder};
///
/// let mut builder =
///     RetryingClientBuilder::with_mapping(RetryConfigMapping::of(|_ctx, _req| None));
/// // Scalar setters exist only in static mode.
/// builder.max_total_attempts(5);
/// ```
pub struct RetryingClientBuilder<M> {
    mode: M,
}

impl RetryingClientBuilder<StaticConfig> {
    /// Static-mode builder from a content-free rule.
    pub fn with_rule(rule: Arc<dyn RetryRule>) -> Self {
        Self {
            mode: StaticConfig {
                config: RetryConfig::builder(rule),
            },
        }
    }

    /// Static-mode builder from a content-aware rule with no buffering cap.
    pub fn with_rule_on_content(rule: Arc<dyn RetryRuleWithContent>) -> Self {
        Self {
            mode: StaticConfig {
                config: RetryConfig::builder_with_content(rule),
            },
        }
    }

    /// Static-mode builder from a content-aware rule that buffers at most
    /// `max_content_length` bytes.
    pub fn with_rule_on_content_limit(
        rule: Arc<dyn RetryRuleWithContent>,
        max_content_length: usize,
    ) -> Self {
        Self {
            mode: StaticConfig {
                config: RetryConfig::builder_with_content_limit(rule, max_content_length),
            },
        }
    }

    /// Sets the maximum allowed number of total attempts. If never set, the
    /// process-wide default applies.
    pub fn max_total_attempts(&mut self, max_total_attempts: u32) -> Result<&mut Self, ConfigError> {
        self.mode.config.max_total_attempts(max_total_attempts)?;
        Ok(self)
    }

    /// Sets the response timeout for each attempt. [`Duration::ZERO`]
    /// disables it. If never set, the process-wide default applies.
    pub fn response_timeout_per_attempt(&mut self, timeout: Duration) -> &mut Self {
        self.mode.config.response_timeout_per_attempt(timeout);
        self
    }

    /// Same as [`response_timeout_per_attempt`](Self::response_timeout_per_attempt),
    /// in milliseconds.
    pub fn response_timeout_millis_per_attempt(&mut self, millis: u64) -> &mut Self {
        self.mode.config.response_timeout_millis_per_attempt(millis);
        self
    }

    /// Builds a config from the currently staged values, without finishing
    /// the builder.
    pub fn retry_config(&self) -> Result<RetryConfig, ConfigError> {
        self.mode.config.build()
    }

    /// Finishes configuration: every request resolves against the staged
    /// builder.
    pub fn into_mapping(self) -> RetryConfigMapping {
        RetryConfigMapping::Static(self.mode.config)
    }
}

impl RetryingClientBuilder<MappedConfig> {
    /// Mapped-mode builder; `mapping` owns per-request resolution.
    ///
    /// There is no debug representation in this mode either, since the
    /// builder holds no staged values to show:
    ///
    /// ```compile_fail
    /// use retrymap::{RetryConfigMapping, RetryingClientBuilder};
    ///
    /// let builder =
    ///     RetryingClientBuilder::with_mapping(RetryConfigMapping::of(|_ctx, _req| None));
    /// println!("{:?}", builder);
    /// ```
    pub fn with_mapping(mapping: RetryConfigMapping) -> Self {
        Self {
            mode: MappedConfig { mapping },
        }
    }

    /// Finishes configuration with the supplied mapping.
    pub fn into_mapping(self) -> RetryConfigMapping {
        self.mode.mapping
    }
}

impl fmt::Debug for RetryingClientBuilder<StaticConfig> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingClientBuilder")
            .field("config", &self.mode.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClientRequest, RequestContext};
    use crate::endpoint::EndpointKey;
    use crate::rule::{rule_fn, RetryDecision};

    fn no_retry_rule() -> Arc<dyn RetryRule> {
        rule_fn(|_ctx, _outcome| RetryDecision::NoRetry)
    }

    fn resolve_attempts(mapping: &RetryConfigMapping) -> u32 {
        let ctx = RequestContext::new(EndpointKey::from_url("https://example.com/").unwrap());
        let req = ClientRequest::new("GET", "https://example.com/a");
        mapping
            .resolve(&ctx, &req)
            .unwrap()
            .expect("retry configured")
            .max_total_attempts()
    }

    #[test]
    fn static_mode_setters_chain_and_stage() {
        let mut builder = RetryingClientBuilder::with_rule(no_retry_rule());
        builder
            .max_total_attempts(3)
            .unwrap()
            .response_timeout_millis_per_attempt(0);

        let config = builder.retry_config().unwrap();
        assert_eq!(config.max_total_attempts(), 3);
        assert_eq!(config.response_timeout_per_attempt(), Duration::ZERO);
        assert!(!config.needs_content());

        assert_eq!(resolve_attempts(&builder.into_mapping()), 3);
    }

    #[test]
    fn static_mode_setter_rejects_zero_attempts() {
        let mut builder = RetryingClientBuilder::with_rule(no_retry_rule());
        let err = builder.max_total_attempts(0).unwrap_err();
        assert_eq!(err, ConfigError::InvalidMaxTotalAttempts(0));
    }

    #[test]
    fn static_mode_has_debug_representation() {
        let mut builder = RetryingClientBuilder::with_rule(no_retry_rule());
        builder.max_total_attempts(4).unwrap();
        let s = format!("{builder:?}");
        assert!(s.contains("max_total_attempts"));
    }

    #[test]
    fn mapped_mode_delegates_resolution_verbatim() {
        let builder = RetryingClientBuilder::with_mapping(RetryConfigMapping::of(|_ctx, _req| None));
        let mapping = builder.into_mapping();
        let ctx = RequestContext::new(EndpointKey::from_url("https://example.com/").unwrap());
        let req = ClientRequest::new("GET", "https://example.com/a");
        assert!(mapping.resolve(&ctx, &req).unwrap().is_none());
    }

    #[test]
    fn content_mode_carries_limit_through() {
        use crate::rule::content_rule_fn;
        let rule = content_rule_fn(|_ctx, _head, _content, _trailers| RetryDecision::NoRetry);
        let builder = RetryingClientBuilder::with_rule_on_content_limit(rule, 1024);
        let config = builder.retry_config().unwrap();
        assert_eq!(config.max_content_length(), 1024);
        assert!(config.needs_content());
    }
}
