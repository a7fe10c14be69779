//! Per-call cancellation and deadline
//!
//! Every suspension point of a call (HTTP send, body read, retry backoff,
//! rate-limit wait) races against the [`CallContext`]. Whichever fires first
//! aborts the call: cancellation with [`WalletError::Cancelled`], an elapsed
//! deadline with [`WalletError::DeadlineExceeded`].

use std::future::{pending, Future};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wallet_domain::{Result, WalletError};

/// Cancellation signal and optional deadline for one call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancellation: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Abort the call when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Abort the call once `timeout` has elapsed from now. A timeout too
    /// large to represent leaves the deadline unchanged.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Abort the call at `deadline`. Keeps the earlier of two deadlines.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Deadline of the call, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail immediately if the call is already cancelled or past its deadline.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded`.
    pub fn check(&self) -> Result<()> {
        if self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(WalletError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(WalletError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `future` unless the call is cancelled or its deadline passes
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded`; `future` is dropped.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output> {
        self.check()?;

        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => pending::<()>().await,
            }
        };
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Err(WalletError::Cancelled),
            () = deadline => Err(WalletError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }

    /// Sleep for `duration`, waking early on cancellation or deadline.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded`.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return self.check();
        }
        self.run(tokio::time::sleep(duration)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_context_runs_to_completion() {
        let ctx = CallContext::background();
        assert_eq!(ctx.run(async { 7 }).await.unwrap(), 7);
        ctx.sleep(Duration::from_millis(1)).await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_token_aborts_sleep() {
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let started = std::time::Instant::now();
        let err = ctx.sleep(Duration::from_secs(10)).await.unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, WalletError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn deadline_aborts_sleep() {
        let ctx = CallContext::background().with_timeout(Duration::from_millis(20));
        let err = ctx.sleep(Duration::from_secs(10)).await.unwrap_err();
        assert!(matches!(err, WalletError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn check_reports_prior_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = CallContext::background().with_cancellation(token);

        assert!(matches!(ctx.check(), Err(WalletError::Cancelled)));
        assert!(matches!(ctx.run(async {}).await, Err(WalletError::Cancelled)));
    }

    #[tokio::test]
    async fn unrepresentable_timeout_means_no_deadline() {
        let ctx = CallContext::background().with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), None);
        ctx.sleep(Duration::from_millis(1)).await.unwrap();

        let bounded = CallContext::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::MAX);
        assert!(bounded.deadline().is_some());
    }

    #[test]
    fn earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = CallContext::background()
            .with_deadline(now + Duration::from_secs(5))
            .with_deadline(now + Duration::from_secs(1));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(1)));
    }
}
