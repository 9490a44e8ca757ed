//! Immutable retry configuration resolved per request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::builder::RetryConfigBuilder;
use crate::error::ConfigError;
use crate::rule::{RetryRule, RetryRuleWithContent};

/// The rule representation held by a [`RetryConfig`].
///
/// Exactly one shape exists per config. The content-aware shape carries the
/// content-free projection derived once at construction; it is never
/// user-supplied.
#[derive(Clone)]
pub enum RuleKind {
    /// Decides from status/headers/failure only.
    #[non_exhaustive]
    ContentFree { rule: Arc<dyn RetryRule> },
    /// Decides after inspecting the buffered response body and trailers.
    #[non_exhaustive]
    ContentAware {
        rule: Arc<dyn RetryRuleWithContent>,
        /// Content-free projection of `rule`, derived at construction.
        content_free: Arc<dyn RetryRule>,
        /// Buffering cap in bytes; `usize::MAX` means no cap.
        max_content_length: usize,
    },
}

/// Immutable retry policy for one request: attempt budget, per-attempt
/// response timeout, and the rule deciding whether to retry.
///
/// Built via [`RetryConfig::builder`] (or the content-aware variants), fully
/// validated once, then only read by the execution loop and the rule
/// evaluation engine. Cloning is cheap; the rules are shared.
#[derive(Clone)]
pub struct RetryConfig {
    max_total_attempts: u32,
    response_timeout_per_attempt: Duration,
    kind: RuleKind,
}

impl RetryConfig {
    /// Returns a builder using a content-free rule.
    pub fn builder(rule: Arc<dyn RetryRule>) -> RetryConfigBuilder {
        RetryConfigBuilder::content_free(rule)
    }

    /// Returns a builder using a content-aware rule with no buffering cap.
    pub fn builder_with_content(rule: Arc<dyn RetryRuleWithContent>) -> RetryConfigBuilder {
        RetryConfigBuilder::content_aware(rule)
    }

    /// Returns a builder using a content-aware rule that buffers at most
    /// `max_content_length` bytes before the rule decides.
    pub fn builder_with_content_limit(
        rule: Arc<dyn RetryRuleWithContent>,
        max_content_length: usize,
    ) -> RetryConfigBuilder {
        RetryConfigBuilder::content_aware_with_limit(rule, max_content_length)
    }

    pub(crate) fn new(
        kind: RuleKind,
        max_total_attempts: u32,
        response_timeout_per_attempt: Duration,
    ) -> Result<Self, ConfigError> {
        if max_total_attempts == 0 {
            return Err(ConfigError::InvalidMaxTotalAttempts(max_total_attempts));
        }
        Ok(Self {
            max_total_attempts,
            response_timeout_per_attempt,
            kind,
        })
    }

    /// Maximum number of total attempts, including the first.
    pub fn max_total_attempts(&self) -> u32 {
        self.max_total_attempts
    }

    /// Response timeout applied to each attempt. Zero means disabled.
    pub fn response_timeout_per_attempt(&self) -> Duration {
        self.response_timeout_per_attempt
    }

    /// The rule representation, for callers that prefer to match on it.
    pub fn rule_kind(&self) -> &RuleKind {
        &self.kind
    }

    /// The content-free rule, if this config uses one.
    pub fn rule(&self) -> Option<&Arc<dyn RetryRule>> {
        match &self.kind {
            RuleKind::ContentFree { rule } => Some(rule),
            RuleKind::ContentAware { .. } => None,
        }
    }

    /// The content-aware rule, if this config uses one.
    pub fn rule_with_content(&self) -> Option<&Arc<dyn RetryRuleWithContent>> {
        match &self.kind {
            RuleKind::ContentFree { .. } => None,
            RuleKind::ContentAware { rule, .. } => Some(rule),
        }
    }

    /// Content-free projection of the content-aware rule, derived at
    /// construction. `None` for content-free configs (use [`RetryConfig::rule`]
    /// there).
    pub fn derived_content_free_rule(&self) -> Option<&Arc<dyn RetryRule>> {
        match &self.kind {
            RuleKind::ContentFree { .. } => None,
            RuleKind::ContentAware { content_free, .. } => Some(content_free),
        }
    }

    /// Buffering cap in bytes; zero for content-free configs.
    pub fn max_content_length(&self) -> usize {
        match &self.kind {
            RuleKind::ContentFree { .. } => 0,
            RuleKind::ContentAware {
                max_content_length, ..
            } => *max_content_length,
        }
    }

    /// True if the rule needs the response body before it can decide.
    pub fn needs_content(&self) -> bool {
        matches!(self.kind, RuleKind::ContentAware { .. })
    }

    /// True if the execution loop must wait for response trailers before a
    /// retry decision can be made.
    pub fn requires_response_trailers(&self) -> bool {
        match &self.kind {
            RuleKind::ContentFree { rule } => rule.requires_response_trailers(),
            RuleKind::ContentAware { rule, .. } => rule.requires_response_trailers(),
        }
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("RetryConfig");
        d.field("max_total_attempts", &self.max_total_attempts)
            .field(
                "response_timeout_per_attempt",
                &self.response_timeout_per_attempt,
            );
        match &self.kind {
            RuleKind::ContentFree { .. } => {
                d.field("rule", &"content-free");
            }
            RuleKind::ContentAware {
                max_content_length, ..
            } => {
                d.field("rule", &"content-aware")
                    .field("max_content_length", max_content_length);
            }
        }
        d.finish()
    }
}
