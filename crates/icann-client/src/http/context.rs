//! Per-request cancellation and deadline

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied bounds for a single request
///
/// The effective timeout of a request is the shorter of the client timeout
/// and the time left until `deadline`. A fired cancellation token aborts the
/// in-flight call with [`crate::Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl RequestContext {
    /// A context with no deadline that is never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Bound the request to `timeout` from now
    ///
    /// A timeout too large to represent as an instant adds no deadline; the
    /// client timeout still applies.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Shorter of `limit` and the remaining time
    pub(crate) fn effective_timeout(&self, limit: Duration) -> Duration {
        match self.remaining() {
            Some(remaining) => remaining.min(limit),
            None => limit,
        }
    }
}
