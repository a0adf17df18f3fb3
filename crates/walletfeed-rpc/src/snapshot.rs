//! Last-result cache of the activity history.
//!
//! Refreshes may overlap. Each takes a ticket when it starts and its outcome is kept
//! only if no later-started refresh has been stored already, so a slow stale response
//! can never overwrite a fresher one.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use walletfeed_primitives::{AccountId, HistoryType, MergedActivity};

/// One in-flight refresh.
///
/// The refresh stays in flight until the ticket is completed, failed or dropped.
#[must_use]
#[derive(Debug)]
pub struct RefreshTicket<'a> {
    snapshot: &'a HistorySnapshot,
    number: u64,
}

impl RefreshTicket<'_> {
    pub fn number(&self) -> u64 {
        self.number
    }
}

impl Drop for RefreshTicket<'_> {
    fn drop(&mut self) {
        let mut state = self.snapshot.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Point-in-time view of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotView {
    /// Whether a refresh is in flight.
    pub loading: bool,
    pub activity: Vec<MergedActivity>,
    /// Ticket number of the stored result, `0` before the first stored result.
    pub generation: u64,
}

#[derive(Debug, Default)]
struct State {
    next_ticket: u64,
    in_flight: usize,
    generation: u64,
    activity: Vec<MergedActivity>,
}

/// Most recently stored activity history.
#[derive(Debug, Default)]
pub struct HistorySnapshot {
    state: Mutex<State>,
}

impl HistorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a refresh.
    pub fn begin(&self) -> RefreshTicket<'_> {
        let mut state = self.state.lock();
        state.next_ticket += 1;
        state.in_flight += 1;
        RefreshTicket {
            snapshot: self,
            number: state.next_ticket,
        }
    }

    /// Stores the result of the refresh identified by `ticket`.
    ///
    /// Returns `false` if the result is stale and has been discarded.
    pub fn complete(&self, ticket: RefreshTicket<'_>, activity: Vec<MergedActivity>) -> bool {
        let mut state = self.state.lock();

        if ticket.number <= state.generation {
            tracing::debug!(
                ticket = ticket.number,
                generation = state.generation,
                "Discarding stale activity history"
            );
            drop(state);
            return false;
        }

        state.generation = ticket.number;
        state.activity = activity;
        drop(state);
        true
    }

    /// Ends a failed refresh, the stored history is left untouched.
    pub fn fail(&self, ticket: RefreshTicket<'_>) {
        tracing::debug!(
            ticket = ticket.number,
            "Activity history refresh failed, keeping stored result"
        );
    }

    /// Runs `refresh` under a fresh ticket and records its outcome.
    ///
    /// Dropping the returned future before it resolves ends the refresh without
    /// touching the stored history.
    pub async fn refresh<F, E>(&self, refresh: F) -> Result<Vec<MergedActivity>, E>
    where
        F: Future<Output = Result<Vec<MergedActivity>, E>>,
    {
        let ticket = self.begin();
        match refresh.await {
            Ok(activity) => {
                self.complete(ticket, activity.clone());
                Ok(activity)
            }
            Err(err) => {
                self.fail(ticket);
                Err(err)
            }
        }
    }

    pub fn view(&self) -> SnapshotView {
        let state = self.state.lock();
        SnapshotView {
            loading: state.in_flight > 0,
            activity: state.activity.clone(),
            generation: state.generation,
        }
    }
}

/// Identifies the cached history of one query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub account_id: AccountId,
    pub history_type: HistoryType,
}

/// One [`HistorySnapshot`] per account and history type.
#[derive(Debug, Default)]
pub struct HistorySnapshots {
    by_key: Mutex<HashMap<SnapshotKey, Arc<HistorySnapshot>>>,
}

impl HistorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot of `key`, creating an empty one on first use.
    pub fn get_or_create(&self, key: SnapshotKey) -> Arc<HistorySnapshot> {
        self.by_key.lock().entry(key).or_default().clone()
    }

    /// Returns the view of `key`, an empty view if nothing was cached for it.
    pub fn view(&self, key: SnapshotKey) -> SnapshotView {
        let snapshot = self.by_key.lock().get(&key).cloned();
        snapshot.map(|s| s.view()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn activity(height: u64) -> Vec<MergedActivity> {
        vec![MergedActivity {
            txid: None,
            fee: None,
            priority_fee: None,
            from: None,
            outputs: None,
            batch_output: None,
            message: "Received 1".to_string(),
            change_amount: "+ 1".to_string(),
            timestamp: height,
            height,
            index: 0,
            release_date: None,
            utxos: Vec::new(),
        }]
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let snapshot = HistorySnapshot::new();

        let slow = snapshot.begin();
        let fast = snapshot.begin();
        assert!(snapshot.view().loading);

        assert!(snapshot.complete(fast, activity(2)));
        assert!(snapshot.view().loading);
        assert!(!snapshot.complete(slow, activity(1)));

        let view = snapshot.view();
        assert!(!view.loading);
        assert_eq!(view.activity, activity(2));
        assert_eq!(view.generation, 2);
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let snapshot = HistorySnapshot::new();
        assert_eq!(snapshot.view(), SnapshotView::default());

        let first = snapshot.begin();
        snapshot.complete(first, activity(5));

        let second = snapshot.begin();
        assert_eq!(second.number(), 2);
        snapshot.fail(second);

        let view = snapshot.view();
        assert!(!view.loading);
        assert_eq!(view.activity, activity(5));
        assert_eq!(view.generation, 1);
    }

    #[test]
    fn test_dropped_ticket_ends_refresh() {
        let snapshot = HistorySnapshot::new();

        let ticket = snapshot.begin();
        assert!(snapshot.view().loading);
        drop(ticket);

        let view = snapshot.view();
        assert!(!view.loading);
        assert_eq!(view.generation, 0);
    }

    #[tokio::test]
    async fn test_refresh_records_outcome() {
        let snapshot = HistorySnapshot::new();

        let stored = snapshot
            .refresh(async { Ok::<_, String>(activity(9)) })
            .await
            .unwrap();
        assert_eq!(stored, activity(9));

        let err = snapshot
            .refresh(async { Err::<Vec<MergedActivity>, _>("offline".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");

        assert_eq!(snapshot.view().activity, activity(9));
        assert!(!snapshot.view().loading);
    }

    #[tokio::test]
    async fn test_cancelled_refresh_clears_loading() {
        let snapshot = HistorySnapshot::new();
        snapshot
            .refresh(async { Ok::<_, String>(activity(3)) })
            .await
            .unwrap();

        let timed_out = tokio::time::timeout(
            Duration::from_millis(10),
            snapshot.refresh(std::future::pending::<Result<Vec<MergedActivity>, String>>()),
        )
        .await;
        assert!(timed_out.is_err());

        let view = snapshot.view();
        assert!(!view.loading);
        assert_eq!(view.activity, activity(3));
        assert_eq!(view.generation, 1);
    }

    #[test]
    fn test_snapshots_are_keyed_by_query() {
        let snapshots = HistorySnapshots::new();
        let all = SnapshotKey {
            account_id: 0,
            history_type: HistoryType::All,
        };
        let send = SnapshotKey {
            account_id: 0,
            history_type: HistoryType::Send,
        };
        let other_account = SnapshotKey {
            account_id: 1,
            history_type: HistoryType::All,
        };

        let snapshot = snapshots.get_or_create(all);
        let ticket = snapshot.begin();
        snapshot.complete(ticket, activity(4));

        assert_eq!(snapshots.view(all).activity, activity(4));
        assert_eq!(snapshots.view(send), SnapshotView::default());
        assert_eq!(snapshots.view(other_account), SnapshotView::default());
        assert!(Arc::ptr_eq(&snapshot, &snapshots.get_or_create(all)));
    }
}
