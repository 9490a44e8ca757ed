//! Content-free projection of a content-aware rule.

use std::sync::Arc;

use crate::context::RequestContext;

use super::{AttemptOutcome, RetryDecision, RetryRule, RetryRuleWithContent};

/// Degrades a content-aware rule to a content-free approximation.
///
/// Response outcomes are forwarded to the wrapped rule with an empty body and
/// no trailers, so header-only fast paths can consult it without buffering.
/// Transport failures yield [`RetryDecision::NoRetry`]: the wrapped rule only
/// ever approves retries after seeing a response, and the projection must not
/// invent one it never approved.
pub fn without_content(rule: Arc<dyn RetryRuleWithContent>) -> Arc<dyn RetryRule> {
    Arc::new(ContentStripped { inner: rule })
}

struct ContentStripped {
    inner: Arc<dyn RetryRuleWithContent>,
}

impl RetryRule for ContentStripped {
    fn decide(&self, ctx: &RequestContext, outcome: AttemptOutcome<'_>) -> RetryDecision {
        match outcome {
            AttemptOutcome::Response(head) => self.inner.decide(ctx, head, &[], &[]),
            AttemptOutcome::Failed(_) => RetryDecision::NoRetry,
        }
    }

    fn requires_response_trailers(&self) -> bool {
        self.inner.requires_response_trailers()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{content_rule_fn, AttemptError, ResponseHead};
    use super::*;
    use crate::endpoint::EndpointKey;
    use std::time::Duration;

    fn ctx() -> RequestContext {
        RequestContext::new(EndpointKey::from_url("https://example.com/").unwrap())
    }

    /// Retries 5xx only when the buffered body is empty, so the projection's
    /// empty-content forwarding is observable.
    fn empty_body_5xx_rule() -> Arc<dyn RetryRuleWithContent> {
        content_rule_fn(|_ctx, head, content, _trailers| {
            if head.status >= 500 && content.is_empty() {
                RetryDecision::RetryAfter(Duration::from_millis(100))
            } else {
                RetryDecision::NoRetry
            }
        })
    }

    #[test]
    fn forwards_responses_with_empty_content() {
        let projected = without_content(empty_body_5xx_rule());
        let head = ResponseHead::new(503);
        assert_eq!(
            projected.decide(&ctx(), AttemptOutcome::Response(&head)),
            RetryDecision::RetryAfter(Duration::from_millis(100))
        );

        let ok = ResponseHead::new(200);
        assert_eq!(
            projected.decide(&ctx(), AttemptOutcome::Response(&ok)),
            RetryDecision::NoRetry
        );
    }

    #[test]
    fn declines_transport_failures() {
        let projected = without_content(empty_body_5xx_rule());
        let err = AttemptError::Timeout;
        assert_eq!(
            projected.decide(&ctx(), AttemptOutcome::Failed(&err)),
            RetryDecision::NoRetry
        );
    }

    #[test]
    fn trailer_requirement_passes_through() {
        struct TrailerRule;

        impl RetryRuleWithContent for TrailerRule {
            fn decide(
                &self,
                _ctx: &RequestContext,
                _head: &ResponseHead,
                _content: &[u8],
                _trailers: &[(String, String)],
            ) -> RetryDecision {
                RetryDecision::NoRetry
            }

            fn requires_response_trailers(&self) -> bool {
                true
            }
        }

        let projected = without_content(Arc::new(TrailerRule));
        assert!(projected.requires_response_trailers());
    }
}
