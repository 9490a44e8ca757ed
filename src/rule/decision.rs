//! Decision returned by rule evaluation.

use std::time::Duration;

/// Decision returned by a retry rule.
///
/// The delay carried by `RetryAfter` comes from the rule itself (e.g. a
/// server `Retry-After` header or the rule's own backoff); this crate never
/// computes backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this attempt.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}
