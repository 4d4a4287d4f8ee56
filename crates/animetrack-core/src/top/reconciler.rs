//! # Top-List Reconciler
//!
//! Keeps the ranked favorites list consistent between optimistic local state
//! and the server. Every mutation is applied locally first, then persisted,
//! then settled by refetching the whole list. The refetch is the only writer
//! of the canonical sequence and doubles as rollback when a call failed.
//!
//! Collaborator failures are logged and never abort the flow; the trailing
//! refetch shows whatever the server actually persisted.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::drag::{DragEnd, DragIntent};
use super::list::TopList;
use crate::api::TopListApi;
use crate::error::Result;
use crate::types::{AnimeId, Capacity, TopEntry, TopEntryId};

/// The local change a mutation is applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    Add { anime_id: AnimeId },
    Remove { entry_id: Option<TopEntryId> },
    Reorder { from: usize, to: usize },
}

/// Where the reconciler is in its mutate/settle cycle.
///
/// There is no error state: a failed call still proceeds to `Reconciling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncState {
    /// Local state matches the last server snapshot.
    #[default]
    Idle,
    /// A local change is applied and its calls are in flight.
    Mutating(Mutation),
    /// The authoritative list is being refetched.
    Reconciling,
}

/// Everything a view needs to render the top list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSnapshot {
    pub list: TopList,
    pub state: SyncState,
    pub capacity: Capacity,
}

impl TopSnapshot {
    #[must_use]
    pub fn new(capacity: Capacity) -> Self {
        Self {
            list: TopList::default(),
            state: SyncState::Idle,
            capacity,
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.list.len() >= self.capacity.get()
    }
}

/// Result of [`Reconciler::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at `position` and sent to the server.
    Added { position: u32 },
    /// The list is at capacity; nothing was sent.
    Full,
    /// The anime is already ranked; nothing was sent.
    Duplicate,
}

/// Result of [`Reconciler::reorder`] and [`Reconciler::handle_drag_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Nothing to do; no call was made.
    Unchanged,
    /// The list was spliced and `corrections` position writes were issued,
    /// `failed` of which were rejected.
    Reordered { corrections: usize, failed: usize },
    /// The entry was dropped outside the list and removed.
    Removed,
}

/// Explicit store for one user's top list.
///
/// Owned by the composition root. Views read through [`snapshot`](Self::snapshot)
/// or [`subscribe`](Self::subscribe) and mutate only through the operations
/// below. Mutations take `&self`, so a second one can start while the first
/// is still awaiting the server; whichever refetch lands last wins.
pub struct Reconciler<A> {
    api: A,
    state: watch::Sender<TopSnapshot>,
}

impl<A: TopListApi> Reconciler<A> {
    pub fn new(api: A, capacity: Capacity) -> Self {
        let (state, _) = watch::channel(TopSnapshot::new(capacity));
        Self { api, state }
    }

    /// The collaborator this store writes through.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TopSnapshot {
        self.state.borrow().clone()
    }

    /// A receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TopSnapshot> {
        self.state.subscribe()
    }

    /// Fetches the authoritative list.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error; local state is kept and the state
    /// returns to `Idle`.
    pub async fn load(&self) -> Result<()> {
        self.reconcile().await
    }

    /// Adds `anime_id` at the end of the list.
    ///
    /// Refused without any call when the list is full or already holds the anime.
    pub async fn add(&self, anime_id: AnimeId) -> AddOutcome {
        let mut outcome = AddOutcome::Full;
        self.state.send_if_modified(|snap| {
            if snap.list.contains_anime(anime_id) {
                outcome = AddOutcome::Duplicate;
                return false;
            }
            if snap.is_full() {
                outcome = AddOutcome::Full;
                return false;
            }
            let position = snap.list.len() as u32;
            snap.list.push(TopEntry::pending(anime_id, position));
            transition(snap, SyncState::Mutating(Mutation::Add { anime_id }));
            outcome = AddOutcome::Added { position };
            true
        });

        let AddOutcome::Added { position } = outcome else {
            debug!(anime_id, ?outcome, "add to top refused");
            return outcome;
        };

        match self.api.add_to_top(anime_id, position).await {
            Ok(created) => {
                info!(anime_id, position, "added to top");
                self.state.send_modify(|snap| snap.list.acknowledge(created));
            }
            Err(err) => warn!(anime_id, position, error = %err, "failed to add anime to top"),
        }

        self.settle().await;
        outcome
    }

    /// Removes the entry with server id `entry_id`.
    ///
    /// Returns `false` without any call if the entry is not in the list.
    /// Siblings are not renumbered locally; the refetch reflects the server's
    /// numbering.
    pub async fn remove(&self, entry_id: TopEntryId) -> bool {
        let Some(index) = self.state.borrow().list.index_of(entry_id) else {
            debug!(entry_id, "remove requested for unknown top entry");
            return false;
        };
        self.remove_at(index).await.is_ok()
    }

    /// Removes the entry shown at `index`.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::IndexOutOfBounds` without any call when
    /// `index` is past the end.
    pub async fn remove_at(&self, index: usize) -> Result<()> {
        let mut removed = None;
        let mut failure = None;
        self.state.send_if_modified(|snap| match snap.list.remove_at(index) {
            Ok(entry) => {
                transition(snap, SyncState::Mutating(Mutation::Remove { entry_id: entry.id }));
                removed = Some(entry);
                true
            }
            Err(err) => {
                failure = Some(err);
                false
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }

        if let Some(entry_id) = removed.and_then(|entry| entry.id) {
            match self.api.remove_from_top(entry_id).await {
                Ok(()) => info!(entry_id, "removed from top"),
                Err(err) => warn!(entry_id, error = %err, "failed to remove anime from top"),
            }
        }

        self.settle().await;
        Ok(())
    }

    /// Moves the entry at `source` to `destination`.
    ///
    /// A `None` destination means the entry was dropped outside the list and
    /// is removed. Position writes are sent one at a time in ascending index
    /// order; a failed write is logged and the rest are still attempted.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::IndexOutOfBounds` without any call when an
    /// index is past the end.
    pub async fn reorder(
        &self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<ReorderOutcome> {
        let Some(destination) = destination else {
            self.remove_at(source).await?;
            return Ok(ReorderOutcome::Removed);
        };
        if source == destination {
            return Ok(ReorderOutcome::Unchanged);
        }

        let mut result = Ok(Vec::new());
        self.state.send_if_modified(|snap| {
            if let Err(err) = snap.list.move_entry(source, destination) {
                result = Err(err);
                return false;
            }
            transition(
                snap,
                SyncState::Mutating(Mutation::Reorder {
                    from: source,
                    to: destination,
                }),
            );
            result = Ok(snap.list.position_corrections());
            true
        });
        let corrections = result?;

        let mut failed = 0;
        for correction in &corrections {
            let entry_id = correction.entry_id;
            let new_position = correction.new_position;
            match self.api.update_position(entry_id, new_position).await {
                Ok(_) => {
                    debug!(entry_id, new_position, "top position updated");
                    self.state
                        .send_modify(|snap| snap.list.set_position(entry_id, new_position));
                }
                Err(err) => {
                    failed += 1;
                    error!(entry_id, new_position, error = %err, "failed to update top position");
                }
            }
        }

        info!(
            from = source,
            to = destination,
            corrections = corrections.len(),
            failed,
            "top list reordered"
        );
        self.settle().await;
        Ok(ReorderOutcome::Reordered {
            corrections: corrections.len(),
            failed,
        })
    }

    /// Applies a finished drag gesture.
    ///
    /// Only drags that start in the top list matter. Dropping inside it
    /// reorders, dropping outside every zone removes, and dropping into
    /// another container is ignored.
    ///
    /// # Errors
    ///
    /// See [`reorder`](Self::reorder).
    pub async fn handle_drag_end(&self, drag: &DragEnd) -> Result<ReorderOutcome> {
        match drag.intent() {
            DragIntent::Ignore => Ok(ReorderOutcome::Unchanged),
            DragIntent::Remove(index) => self.reorder(index, None).await,
            DragIntent::Move { from, to } => self.reorder(from, Some(to)).await,
        }
    }

    /// Changes the capacity. Shrinking below the current length truncates the
    /// local list only; nothing is sent. Returns how many entries were dropped.
    pub fn set_capacity(&self, capacity: Capacity) -> usize {
        let mut dropped = 0;
        self.state.send_modify(|snap| {
            snap.capacity = capacity;
            dropped = snap.list.truncate(capacity.get());
        });
        if dropped > 0 {
            info!(%capacity, dropped, "top list truncated to new capacity");
        }
        dropped
    }

    /// Replaces local state with the server's list.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error after going back to `Idle` with the
    /// local list untouched.
    pub async fn reconcile(&self) -> Result<()> {
        self.state
            .send_modify(|snap| transition(snap, SyncState::Reconciling));
        let fetched = self.api.fetch_top().await;
        self.state.send_modify(|snap| {
            if let Ok(entries) = &fetched {
                snap.list = TopList::from_server(entries.clone());
            }
            transition(snap, SyncState::Idle);
        });

        let entries = fetched?;
        debug!(len = entries.len(), "top list reconciled");
        Ok(())
    }

    async fn settle(&self) {
        if let Err(err) = self.reconcile().await {
            warn!(error = %err, "failed to refetch top list, keeping local order");
        }
    }
}

fn transition(snap: &mut TopSnapshot, next: SyncState) {
    debug!(from = ?snap.state, to = ?next, "top list state");
    snap.state = next;
}
