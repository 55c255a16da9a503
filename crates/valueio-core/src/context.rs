use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Result, StreamError};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Mark the flag as cancelled. Returns true on the first call only.
    pub fn cancel(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Per-call context threaded through every read and write.
///
/// Readers, writers and combinators never inspect it; they hand it to the
/// implementation they wrap. Implementations backed by blocking sources may
/// call [`Context::check`] between steps if they want to honour it.
#[derive(Clone, Debug, Default)]
pub struct Context {
    cancellation: Cancellation,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context sharing `cancellation`.
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Derive a context with an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Derive a context whose deadline is `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now()
            .checked_add(timeout)
            .unwrap_or_else(Instant::now);
        self.with_deadline(deadline)
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail with `Cancelled` or `DeadlineExceeded` if either applies.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        if self.is_expired() {
            return Err(StreamError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_passes_check() {
        let ctx = Context::background();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let cancellation = Cancellation::new();
        let ctx = Context::background().with_cancellation(cancellation.clone());
        let child = ctx.clone();

        assert!(cancellation.cancel());
        assert!(!cancellation.cancel());
        assert!(child.is_cancelled());
        assert!(matches!(child.check(), Err(StreamError::Cancelled)));
    }

    #[test]
    fn past_deadline_fails_check() {
        let ctx = Context::background().with_deadline(Instant::now());
        assert!(ctx.is_expired());
        assert!(matches!(ctx.check(), Err(StreamError::DeadlineExceeded)));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn future_deadline_passes_check() {
        let ctx = Context::background().with_timeout(Duration::from_secs(60));
        assert!(ctx.check().is_ok());
        assert!(ctx.remaining().is_some_and(|left| left > Duration::ZERO));
    }
}
