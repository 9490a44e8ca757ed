//! Retry rule interface.
//!
//! After each attempt the (external) execution loop evaluates one of two rule
//! shapes: a content-free rule deciding from the response head or transport
//! failure alone, and a content-aware rule that additionally inspects the
//! buffered response body and trailers. This module defines both shapes, the
//! decision they return, and the content-free projection of a content-aware
//! rule used on header-only fast paths.

mod convert;
mod decision;
mod outcome;

pub use convert::without_content;
pub use decision::RetryDecision;
pub use outcome::{AttemptError, AttemptOutcome, ResponseHead, Trailers};

use std::sync::Arc;

use crate::context::RequestContext;

/// Decides from status/headers/failure only, without buffering the body.
pub trait RetryRule: Send + Sync {
    /// Decide whether the attempt described by `outcome` should be retried.
    fn decide(&self, ctx: &RequestContext, outcome: AttemptOutcome<'_>) -> RetryDecision;

    /// True if this rule must see response trailers before it can decide.
    fn requires_response_trailers(&self) -> bool {
        false
    }
}

/// Decides after inspecting the buffered response body (and trailers).
pub trait RetryRuleWithContent: Send + Sync {
    /// Decide whether to retry, given the response head, the body buffered up
    /// to the config's content limit, and any trailers.
    fn decide(
        &self,
        ctx: &RequestContext,
        head: &ResponseHead,
        content: &[u8],
        trailers: &[(String, String)],
    ) -> RetryDecision;

    /// True if this rule must see response trailers before it can decide.
    fn requires_response_trailers(&self) -> bool {
        false
    }
}

struct FnRule<F>(F);

impl<F> RetryRule for FnRule<F>
where
    F: Fn(&RequestContext, AttemptOutcome<'_>) -> RetryDecision + Send + Sync,
{
    fn decide(&self, ctx: &RequestContext, outcome: AttemptOutcome<'_>) -> RetryDecision {
        (self.0)(ctx, outcome)
    }
}

struct FnRuleWithContent<F>(F);

impl<F> RetryRuleWithContent for FnRuleWithContent<F>
where
    F: Fn(&RequestContext, &ResponseHead, &[u8], &[(String, String)]) -> RetryDecision
        + Send
        + Sync,
{
    fn decide(
        &self,
        ctx: &RequestContext,
        head: &ResponseHead,
        content: &[u8],
        trailers: &[(String, String)],
    ) -> RetryDecision {
        (self.0)(ctx, head, content, trailers)
    }
}

/// Wraps a closure as a shareable content-free rule.
pub fn rule_fn<F>(f: F) -> Arc<dyn RetryRule>
where
    F: Fn(&RequestContext, AttemptOutcome<'_>) -> RetryDecision + Send + Sync + 'static,
{
    Arc::new(FnRule(f))
}

/// Wraps a closure as a shareable content-aware rule.
pub fn content_rule_fn<F>(f: F) -> Arc<dyn RetryRuleWithContent>
where
    F: Fn(&RequestContext, &ResponseHead, &[u8], &[(String, String)]) -> RetryDecision
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnRuleWithContent(f))
}
