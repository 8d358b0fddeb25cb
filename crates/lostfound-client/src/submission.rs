use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::ApiError;

/// Handle for one submission started through a [`SubmissionSlot`].
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: Uuid,
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

struct SlotState<T> {
    generation: u64,
    token: CancellationToken,
    latest: Option<T>,
}

/// Owns the result of the most recent submission.
///
/// Starting a submission cancels the one before it, and only the newest
/// ticket may publish, so a slow superseded response never overwrites a
/// newer one.
pub struct SubmissionSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> Default for SubmissionSlot<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                token: CancellationToken::new(),
                latest: None,
            }),
        }
    }
}

impl<T: Clone> SubmissionSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new submission, cancelling any in flight.
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        state.token.cancel();
        state.generation += 1;
        state.token = CancellationToken::new();

        let ticket = Ticket {
            id: Uuid::new_v4(),
            generation: state.generation,
            token: state.token.clone(),
        };
        tracing::debug!(id = %ticket.id, generation = ticket.generation, "submission started");
        ticket
    }

    /// Cancel the current submission without starting another.
    pub fn cancel(&self) {
        self.lock().token.cancel();
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let state = self.lock();
        state.generation == ticket.generation && !ticket.is_cancelled()
    }

    /// Drive `fut` to completion unless the ticket is cancelled first.
    pub async fn run<F, R>(&self, ticket: &Ticket, fut: F) -> Result<R, ApiError>
    where
        F: Future<Output = Result<R, ApiError>>,
    {
        tokio::select! {
            biased;
            _ = ticket.token.cancelled() => {
                tracing::debug!(id = %ticket.id, "submission cancelled");
                Err(ApiError::Cancelled)
            }
            result = fut => result,
        }
    }

    /// Store `value` as the latest result if `ticket` is still current.
    /// Returns whether the value was accepted.
    pub fn publish(&self, ticket: &Ticket, value: T) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.generation || ticket.is_cancelled() {
            tracing::debug!(id = %ticket.id, "discarding stale submission result");
            return false;
        }
        state.latest = Some(value);
        true
    }

    pub fn latest(&self) -> Option<T> {
        self.lock().latest.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_cancels_previous_ticket() {
        let slot: SubmissionSlot<u32> = SubmissionSlot::new();
        let first = slot.begin();
        assert!(slot.is_current(&first));

        let second = slot.begin();
        assert!(first.is_cancelled());
        assert!(!slot.is_current(&first));
        assert!(slot.is_current(&second));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn stale_results_are_not_published() {
        let slot = SubmissionSlot::new();
        let a = slot.begin();
        let b = slot.begin();

        assert!(slot.publish(&b, "B"));
        assert!(!slot.publish(&a, "A"));
        assert_eq!(slot.latest(), Some("B"));
    }

    #[test]
    fn cancel_blocks_publish() {
        let slot = SubmissionSlot::new();
        let ticket = slot.begin();
        slot.cancel();
        assert!(!slot.publish(&ticket, 1));
        assert_eq!(slot.latest(), None);
    }

    #[tokio::test]
    async fn run_returns_cancelled_when_superseded() {
        let slot: SubmissionSlot<()> = SubmissionSlot::new();
        let ticket = slot.begin();

        let pending = slot.run(&ticket, std::future::pending::<Result<(), ApiError>>());
        let _newer = slot.begin();

        let result = pending.await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn run_passes_through_results() {
        let slot: SubmissionSlot<u8> = SubmissionSlot::new();
        let ticket = slot.begin();

        let ok = slot.run(&ticket, async { Ok(7u8) }).await.unwrap();
        assert!(slot.publish(&ticket, ok));

        let err = slot
            .run(&ticket, async {
                Err::<u8, _>(ApiError::Request {
                    status: 500,
                    body: "boom".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(slot.latest(), Some(7));
    }
}
