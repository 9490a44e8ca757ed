//! Staged, validated construction of [`RetryConfig`] values.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{RetryConfig, RuleKind};
use crate::defaults;
use crate::error::ConfigError;
use crate::rule::{self, RetryRule, RetryRuleWithContent};

/// Rule shape selected when the builder was created. Fixed for the
/// builder's lifetime.
#[derive(Clone)]
enum StagedRule {
    ContentFree(Arc<dyn RetryRule>),
    ContentAware {
        rule: Arc<dyn RetryRuleWithContent>,
        max_content_length: usize,
    },
}

/// Collects overrides and produces validated [`RetryConfig`] instances on
/// demand.
///
/// Created by [`RetryConfig::builder`] and its content-aware variants; the
/// constructor fixes the rule shape. Fields never staged fall back to the
/// process-wide [`defaults`](crate::defaults) when [`build`](Self::build)
/// runs; that is the only point where external defaults are consulted.
/// `build` may be called repeatedly; each call re-validates the staged
/// values and yields a fresh config.
///
/// Builders are not meant to be shared across threads; each client build owns
/// its own.
#[derive(Clone)]
pub struct RetryConfigBuilder {
    rule: StagedRule,
    max_total_attempts: Option<u32>,
    response_timeout_per_attempt: Option<Duration>,
}

impl RetryConfigBuilder {
    pub(crate) fn content_free(rule: Arc<dyn RetryRule>) -> Self {
        Self {
            rule: StagedRule::ContentFree(rule),
            max_total_attempts: None,
            response_timeout_per_attempt: None,
        }
    }

    pub(crate) fn content_aware(rule: Arc<dyn RetryRuleWithContent>) -> Self {
        Self::content_aware_with_limit(rule, usize::MAX)
    }

    pub(crate) fn content_aware_with_limit(
        rule: Arc<dyn RetryRuleWithContent>,
        max_content_length: usize,
    ) -> Self {
        Self {
            rule: StagedRule::ContentAware {
                rule,
                max_content_length,
            },
            max_total_attempts: None,
            response_timeout_per_attempt: None,
        }
    }

    /// Stages the maximum allowed number of total attempts, including the
    /// first.
    pub fn max_total_attempts(&mut self, max_total_attempts: u32) -> Result<&mut Self, ConfigError> {
        if max_total_attempts == 0 {
            return Err(ConfigError::InvalidMaxTotalAttempts(max_total_attempts));
        }
        self.max_total_attempts = Some(max_total_attempts);
        Ok(self)
    }

    /// Stages the response timeout applied to each attempt.
    /// [`Duration::ZERO`] disables the per-attempt timeout.
    pub fn response_timeout_per_attempt(&mut self, timeout: Duration) -> &mut Self {
        self.response_timeout_per_attempt = Some(timeout);
        self
    }

    /// Same as [`response_timeout_per_attempt`](Self::response_timeout_per_attempt),
    /// in milliseconds.
    pub fn response_timeout_millis_per_attempt(&mut self, millis: u64) -> &mut Self {
        self.response_timeout_per_attempt(Duration::from_millis(millis))
    }

    /// Validates the staged values and returns a new immutable config.
    ///
    /// Runs the same checks as config construction, so a value the setter
    /// already rejected can never slip through a later build.
    pub fn build(&self) -> Result<RetryConfig, ConfigError> {
        let d = defaults::process_defaults();
        let max_total_attempts = self.max_total_attempts.unwrap_or(d.max_total_attempts);
        let response_timeout = self
            .response_timeout_per_attempt
            .unwrap_or_else(|| d.response_timeout());

        let kind = match &self.rule {
            StagedRule::ContentFree(rule) => RuleKind::ContentFree { rule: rule.clone() },
            StagedRule::ContentAware {
                rule,
                max_content_length,
            } => RuleKind::ContentAware {
                rule: rule.clone(),
                content_free: rule::without_content(rule.clone()),
                max_content_length: *max_content_length,
            },
        };

        RetryConfig::new(kind, max_total_attempts, response_timeout)
    }
}

impl fmt::Debug for RetryConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("RetryConfigBuilder");
        d.field("max_total_attempts", &self.max_total_attempts)
            .field(
                "response_timeout_per_attempt",
                &self.response_timeout_per_attempt,
            );
        match &self.rule {
            StagedRule::ContentFree(_) => {
                d.field("rule", &"content-free");
            }
            StagedRule::ContentAware {
                max_content_length, ..
            } => {
                d.field("rule", &"content-aware")
                    .field("max_content_length", max_content_length);
            }
        }
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{content_rule_fn, rule_fn, RetryDecision};

    fn no_retry_rule() -> Arc<dyn RetryRule> {
        rule_fn(|_ctx, _outcome| RetryDecision::NoRetry)
    }

    #[test]
    fn staged_values_round_trip() {
        let mut builder = RetryConfig::builder(no_retry_rule());
        builder.max_total_attempts(3).unwrap();
        builder.response_timeout_millis_per_attempt(0);

        let config = builder.build().unwrap();
        assert_eq!(config.max_total_attempts(), 3);
        // Zero is the explicit "disabled" sentinel, not an error.
        assert_eq!(config.response_timeout_per_attempt(), Duration::ZERO);
        assert!(!config.needs_content());
    }

    #[test]
    fn setter_rejects_zero_attempts() {
        let mut builder = RetryConfig::builder(no_retry_rule());
        let err = builder.max_total_attempts(0).unwrap_err();
        assert_eq!(err, ConfigError::InvalidMaxTotalAttempts(0));

        // The rejected value was not staged; the builder still works.
        let config = builder.build().unwrap();
        assert!(config.max_total_attempts() > 0);
    }

    #[test]
    fn unset_fields_fall_back_to_process_defaults() {
        let config = RetryConfig::builder(no_retry_rule()).build().unwrap();
        let d = defaults::process_defaults();
        assert_eq!(config.max_total_attempts(), d.max_total_attempts);
        assert_eq!(config.response_timeout_per_attempt(), d.response_timeout());
    }

    #[test]
    fn repeated_builds_reflect_current_staged_values() {
        let mut builder = RetryConfig::builder(no_retry_rule());
        builder.max_total_attempts(2).unwrap();
        assert_eq!(builder.build().unwrap().max_total_attempts(), 2);

        builder.max_total_attempts(7).unwrap();
        assert_eq!(builder.build().unwrap().max_total_attempts(), 7);
        // Idempotent without an intervening setter call.
        assert_eq!(builder.build().unwrap().max_total_attempts(), 7);
    }

    #[test]
    fn content_limit_fixed_at_construction() {
        let rule = content_rule_fn(|_ctx, _head, _content, _trailers| RetryDecision::NoRetry);
        let config = RetryConfig::builder_with_content_limit(rule, 1024)
            .build()
            .unwrap();
        assert_eq!(config.max_content_length(), 1024);
        assert!(config.needs_content());
    }

    #[test]
    fn duration_setter_stages_exact_value() {
        let mut builder = RetryConfig::builder(no_retry_rule());
        builder.response_timeout_per_attempt(Duration::from_secs(3));
        assert_eq!(
            builder.build().unwrap().response_timeout_per_attempt(),
            Duration::from_secs(3)
        );
    }
}
