//! Best-effort math typesetting with a bounded wait for the renderer.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::TypesetError;

/// A math renderer that typesets an element in place.
#[async_trait(?Send)]
pub trait TypesetBackend {
    /// Whether the renderer has finished loading.
    async fn is_ready(&self) -> bool;

    /// Typesets the element identified by `target`.
    async fn typeset(&self, target: &str) -> Result<(), TypesetError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypesetPolicy {
    pub max_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for TypesetPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            poll_interval: Duration::from_millis(200),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The renderer never became ready within the poll budget.
    Unavailable,
    /// The renderer rejected the expression.
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypesetOutcome {
    Typeset,
    Fallback(FallbackReason),
}

impl TypesetOutcome {
    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Waits for the renderer (up to `policy.max_attempts` polls) and typesets `target`.
///
/// On timeout or rejection the caller shows the raw expression instead.
pub async fn typeset_with_fallback(
    backend: &dyn TypesetBackend,
    target: &str,
    policy: TypesetPolicy,
) -> TypesetOutcome {
    let mut attempts = 0_u32;
    while !backend.is_ready().await {
        attempts = attempts.saturating_add(1);
        if attempts > policy.max_attempts {
            error!(element = target, attempts, "math renderer failed to load");
            return TypesetOutcome::Fallback(FallbackReason::Unavailable);
        }
        tokio::time::sleep(policy.poll_interval).await;
    }

    match backend.typeset(target).await {
        Ok(()) => {
            debug!(element = target, attempts, "typeset expression");
            TypesetOutcome::Typeset
        }
        Err(err) => {
            error!(element = target, %err, "math typesetting error");
            TypesetOutcome::Fallback(FallbackReason::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FakeBackend {
        ready_after: u32,
        polls: Cell<u32>,
        typeset_calls: Cell<u32>,
        reject: bool,
    }

    impl FakeBackend {
        fn new(ready_after: u32, reject: bool) -> Self {
            Self {
                ready_after,
                polls: Cell::new(0),
                typeset_calls: Cell::new(0),
                reject,
            }
        }
    }

    #[async_trait(?Send)]
    impl TypesetBackend for FakeBackend {
        async fn is_ready(&self) -> bool {
            let polls = self.polls.get();
            self.polls.set(polls + 1);
            polls >= self.ready_after
        }

        async fn typeset(&self, target: &str) -> Result<(), TypesetError> {
            self.typeset_calls.set(self.typeset_calls.get() + 1);
            if self.reject {
                Err(TypesetError::Rejected(format!("bad markup in {target}")))
            } else {
                Ok(())
            }
        }
    }

    fn fast_policy() -> TypesetPolicy {
        TypesetPolicy {
            max_attempts: 10,
            poll_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn typesets_immediately_when_ready() {
        let backend = FakeBackend::new(0, false);
        let outcome = typeset_with_fallback(&backend, "math-0", fast_policy()).await;
        assert_eq!(outcome, TypesetOutcome::Typeset);
        assert_eq!(backend.polls.get(), 1);
        assert_eq!(backend.typeset_calls.get(), 1);
    }

    #[tokio::test]
    async fn waits_for_a_late_renderer() {
        let backend = FakeBackend::new(4, false);
        let outcome = typeset_with_fallback(&backend, "math-0", fast_policy()).await;
        assert_eq!(outcome, TypesetOutcome::Typeset);
        assert_eq!(backend.polls.get(), 5);
    }

    #[tokio::test]
    async fn gives_up_after_the_poll_budget() {
        let backend = FakeBackend::new(u32::MAX, false);
        let outcome = typeset_with_fallback(&backend, "math-0", fast_policy()).await;
        assert_eq!(outcome, TypesetOutcome::Fallback(FallbackReason::Unavailable));
        assert_eq!(backend.polls.get(), 11);
        assert_eq!(backend.typeset_calls.get(), 0);
    }

    #[tokio::test]
    async fn rejection_falls_back_to_raw_text() {
        let backend = FakeBackend::new(0, true);
        let outcome = typeset_with_fallback(&backend, "math-0", fast_policy()).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome, TypesetOutcome::Fallback(FallbackReason::Rejected));
    }
}
