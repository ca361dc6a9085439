//! Cancellable, deadline-bearing execution context for publish calls.
//!
//! A [`PublishContext`] travels with every publish request down to the
//! backend client. Publishers only forward it; backend clients decide how
//! to honor it, usually by wrapping their network future in
//! [`PublishContext::run`].

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a context stopped an operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context was cancelled by its owner
    #[error("context cancelled")]
    Cancelled,

    /// The context deadline passed before the operation finished
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Execution context for a single publish call.
#[derive(Debug, Clone, Default)]
pub struct PublishContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl PublishContext {
    /// Context that is never cancelled and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Expire at `deadline`. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Derive a context that is cancelled with this one but can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self { cancel: self.cancel.child_token(), deadline: self.deadline }
    }

    /// Cancel this context and every child derived from it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The deadline, if one is set.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// The underlying cancellation token.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fail fast if the context is already done.
    ///
    /// # Errors
    /// Returns [`ContextError::Cancelled`] or [`ContextError::DeadlineExceeded`].
    pub fn check(&self) -> Result<(), ContextError> {
        if self.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        if self.is_expired() {
            return Err(ContextError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `future` until it completes or the context is done, whichever
    /// comes first. The future is dropped when the context wins.
    ///
    /// # Errors
    /// Returns [`ContextError::Cancelled`] or [`ContextError::DeadlineExceeded`].
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        self.check()?;

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ContextError::Cancelled),
            () = expired => Err(ContextError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}
