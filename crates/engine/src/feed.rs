//! Live expense-list subscription.
//!
//! Modeled as a snapshot channel rather than a diff stream: every publish
//! carries the full current ordered list for one owner, and subscribers
//! recompute whatever they derive from it. Cancellation is dropping the feed;
//! the engine prunes an owner's sender once no receivers remain.

use std::sync::Arc;

use tokio::sync::watch;

use crate::Expense;

/// Full ordered result set for one owner (descending creation time).
pub type ExpenseSnapshot = Arc<Vec<Expense>>;

/// Receiving half of an owner's live subscription.
///
/// The feed starts primed: the first [`Self::next`] call resolves immediately
/// with the list as of subscription time, later calls wait for the next
/// change.
#[derive(Debug)]
pub struct ExpenseFeed {
    rx: watch::Receiver<ExpenseSnapshot>,
}

impl ExpenseFeed {
    pub(crate) fn new(rx: watch::Receiver<ExpenseSnapshot>) -> Self {
        let mut rx = rx;
        rx.mark_changed();
        Self { rx }
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the publishing side is gone, which ends the
    /// subscription.
    pub async fn next(&mut self) -> Option<ExpenseSnapshot> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        Some(self.rx.borrow_and_update().clone())
    }

    /// Unwraps the underlying watch receiver, e.g. for adapting into a
    /// `Stream`.
    pub fn into_receiver(self) -> watch::Receiver<ExpenseSnapshot> {
        self.rx
    }
}
