//! End-to-end flows of the top-list store against an in-memory server.

use std::sync::Mutex;

use animetrack_core::top::{
    AddOutcome, DragEnd, DropLocation, Mutation, ReorderOutcome, SyncState, TopList,
};
use animetrack_core::types::{AnimeId, TopEntryId};
use animetrack_core::{AnimetrackError, Capacity, Reconciler, Result, TopEntry, TopListApi};
use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Server whose position writes block until the test hands out permits.
struct GatedServer {
    entries: Mutex<Vec<TopEntry>>,
    next_id: Mutex<TopEntryId>,
    gate: Semaphore,
}

impl GatedServer {
    fn new(gated: bool) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            gate: Semaphore::new(if gated { 0 } else { Semaphore::MAX_PERMITS }),
        }
    }

    fn persisted_order(&self) -> Vec<AnimeId> {
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by_key(|e| e.position);
        entries.iter().map(|e| e.anime_id).collect()
    }
}

#[async_trait]
impl TopListApi for GatedServer {
    async fn fetch_top(&self) -> Result<Vec<TopEntry>> {
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by_key(|e| e.position);
        Ok(entries)
    }

    async fn add_to_top(&self, anime_id: AnimeId, position: u32) -> Result<TopEntry> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id - 1
        };
        let entry = TopEntry {
            id: Some(id),
            anime_id,
            position,
            anime: None,
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn remove_from_top(&self, entry_id: TopEntryId) -> Result<()> {
        self.entries.lock().unwrap().retain(|e| e.id != Some(entry_id));
        Ok(())
    }

    async fn update_position(&self, entry_id: TopEntryId, new_position: u32) -> Result<TopEntry> {
        self.gate
            .acquire()
            .await
            .map_err(|e| AnimetrackError::Transport(e.to_string()))?
            .forget();
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == Some(entry_id))
            .ok_or_else(|| AnimetrackError::Status {
                status: 404,
                message: format!("top entry {entry_id} not found"),
            })?;
        entry.position = new_position;
        Ok(entry.clone())
    }
}

async fn seeded(gated: bool, anime_ids: &[AnimeId]) -> Reconciler<GatedServer> {
    let reconciler = Reconciler::new(GatedServer::new(gated), Capacity::default());
    for anime_id in anime_ids {
        assert!(matches!(
            reconciler.add(*anime_id).await,
            AddOutcome::Added { .. }
        ));
    }
    reconciler
}

#[tokio::test]
async fn drag_third_favorite_to_first_slot() {
    let reconciler = seeded(true, &[1, 2, 3, 4]).await;
    let mut rx = reconciler.subscribe();
    let drag = DragEnd {
        source: DropLocation::top(2),
        destination: Some(DropLocation::top(0)),
    };

    let (outcome, mid_flight) = tokio::join!(reconciler.handle_drag_end(&drag), async {
        let snap = rx
            .wait_for(|s| matches!(s.state, SyncState::Mutating(_)))
            .await
            .unwrap()
            .clone();
        // The new order is visible before any position write has completed.
        reconciler.api().gate.add_permits(Semaphore::MAX_PERMITS);
        snap
    });

    assert_eq!(mid_flight.list.anime_ids(), vec![3, 1, 2, 4]);
    assert_eq!(reconciler.api().persisted_order(), vec![3, 1, 2, 4]);
    assert_eq!(
        outcome.unwrap(),
        ReorderOutcome::Reordered {
            corrections: 3,
            failed: 0
        }
    );

    let snap = reconciler.snapshot();
    assert_eq!(snap.state, SyncState::Idle);
    assert_eq!(snap.list.anime_ids(), reconciler.api().persisted_order());
    assert!(snap.list.is_consistent());
}

#[tokio::test]
async fn building_a_top_five_from_scratch() {
    let reconciler = seeded(false, &[11, 12, 13, 14, 15]).await;

    assert_eq!(reconciler.add(16).await, AddOutcome::Full);
    reconciler.reorder(4, Some(0)).await.unwrap();
    reconciler.reorder(1, Some(2)).await.unwrap();

    let snap = reconciler.snapshot();
    assert_eq!(snap.list.anime_ids(), vec![15, 12, 11, 13, 14]);
    assert!(snap.list.is_consistent());
    assert_eq!(snap.list.anime_ids(), reconciler.api().persisted_order());
}

#[tokio::test]
async fn add_proceeds_while_a_reorder_is_in_flight() {
    let reconciler = seeded(true, &[1, 2, 3]).await;
    let mut rx = reconciler.subscribe();

    let (reordered, (added, after_add)) = tokio::join!(reconciler.reorder(2, Some(0)), async {
        rx.wait_for(|s| matches!(s.state, SyncState::Mutating(Mutation::Reorder { .. })))
            .await
            .unwrap();
        // Position writes are blocked; the add still goes through and settles.
        let added = reconciler.add(4).await;
        let after_add = reconciler.snapshot();
        reconciler.api().gate.add_permits(Semaphore::MAX_PERMITS);
        (added, after_add)
    });

    assert_eq!(added, AddOutcome::Added { position: 3 });
    // The add's refetch saw the server before any position write landed and
    // replaced the optimistic order.
    assert_eq!(after_add.list.anime_ids(), vec![1, 2, 3, 4]);
    assert_eq!(after_add.state, SyncState::Idle);

    assert_eq!(
        reordered.unwrap(),
        ReorderOutcome::Reordered {
            corrections: 3,
            failed: 0
        }
    );

    // The reorder's refetch completed last and its view is what remains.
    let server_view = TopList::from_server(reconciler.api().fetch_top().await.unwrap());
    let snap = reconciler.snapshot();
    assert_eq!(snap.list, server_view);
    assert_eq!(snap.list.anime_ids(), vec![3, 1, 2, 4]);
    assert_eq!(snap.state, SyncState::Idle);
    assert!(snap.list.is_consistent());
}

#[tokio::test]
async fn concurrent_remove_and_reorder_both_reach_the_server() {
    let reconciler = seeded(true, &[1, 2, 3, 4]).await;
    let mut rx = reconciler.subscribe();
    let last_id = reconciler.snapshot().list.get(3).unwrap().id.unwrap();

    let (reordered, removed) = tokio::join!(reconciler.reorder(1, Some(0)), async {
        rx.wait_for(|s| matches!(s.state, SyncState::Mutating(Mutation::Reorder { .. })))
            .await
            .unwrap();
        let removed = reconciler.remove(last_id).await;
        reconciler.api().gate.add_permits(Semaphore::MAX_PERMITS);
        removed
    });

    assert!(removed);
    assert!(reordered.is_ok());
    assert_eq!(reconciler.api().persisted_order(), vec![2, 1, 3]);
    assert_eq!(
        reconciler.snapshot().list.anime_ids(),
        reconciler.api().persisted_order()
    );
}
