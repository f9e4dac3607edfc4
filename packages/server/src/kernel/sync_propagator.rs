//! Best-effort propagation of dictionary writes into the search index.
//!
//! Writers commit to Postgres, then hand the committed entry to
//! [`SyncPropagator::schedule`] and return. A background worker pushes each
//! entry to the index on its own task, bounded by a semaphore, and flips the
//! entry's `synced` flag only after the index confirmed the write.
//!
//! Work on one entry is serialized by a per-entry lock, and every run re-reads
//! the row under that lock before writing. An older snapshot therefore can
//! never land in the index after a newer one. Deletes take the same lock.
//!
//! Delivery is at-most-once per schedule call. Failures are logged and
//! dropped; the row simply stays `synced = false` until the reconciliation
//! sweep or an index rebuild schedules it again. Reads never depend on this
//! worker because search falls back to Postgres.
//!
//! ```text
//! create/update ──► Postgres (commit) ──► schedule(entry)
//!                                              │ mpsc
//!                                              ▼
//!                       worker ──► lock(id) ──► propagate() ──► re-read row
//!                                                         ├──► index.upsert
//!                                                         └──► mark_synced(id, updated_at)
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::{mpsc, Notify, OwnedMutexGuard, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::common::DictionaryEntryId;
use crate::domains::dictionary::models::DictionaryEntry;
use crate::kernel::{BaseSearchIndex, SearchDocument};

/// What happened to one propagation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Index confirmed the write and the flag was flipped.
    Synced,
    /// Index write failed or timed out; flag left false.
    IndexFailed,
    /// Row was newer than the scheduled snapshot, or gone; nothing was pushed
    /// for this snapshot.
    Stale,
    /// Index was written but the flag update itself failed.
    FlagUpdateFailed,
    /// Row could not be re-read before pushing.
    LoadFailed,
}

#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn start(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

type EntryLockMap = HashMap<DictionaryEntryId, Arc<tokio::sync::Mutex<()>>>;

/// One async mutex per entry id, dropped from the map once nobody holds or
/// waits for it.
#[derive(Default)]
struct EntryLocks {
    locks: Mutex<EntryLockMap>,
}

impl EntryLocks {
    fn map(&self) -> MutexGuard<'_, EntryLockMap> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn acquire(self: Arc<Self>, id: DictionaryEntryId) -> EntryGuard {
        let lock = self.map().entry(id).or_default().clone();
        let guard = lock.lock_owned().await;
        EntryGuard {
            id,
            locks: self,
            guard: Some(guard),
        }
    }
}

/// Exclusive hold on one entry's index document. Released on drop.
pub struct EntryGuard {
    id: DictionaryEntryId,
    locks: Arc<EntryLocks>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut map = self.locks.map();
        if map
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.id);
        }
    }
}

/// Handle used by writers to enqueue propagation. Cheap to clone.
#[derive(Clone)]
pub struct SyncPropagator {
    tx: mpsc::UnboundedSender<DictionaryEntry>,
    in_flight: Arc<InFlight>,
    locks: Arc<EntryLocks>,
}

impl SyncPropagator {
    /// Start the worker. It runs until every handle has been dropped.
    pub fn spawn(
        pool: PgPool,
        index: Arc<dyn BaseSearchIndex>,
        timeout: Duration,
        concurrency: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<DictionaryEntry>();
        let in_flight = Arc::new(InFlight::default());
        let worker_in_flight = in_flight.clone();
        let locks = Arc::new(EntryLocks::default());
        let worker_locks = locks.clone();

        let handle = tokio::spawn(async move {
            let permits = Arc::new(Semaphore::new(concurrency.max(1)));

            while let Some(entry) = rx.recv().await {
                let permit = match permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let pool = pool.clone();
                let index = index.clone();
                let in_flight = worker_in_flight.clone();
                let locks = worker_locks.clone();

                tokio::spawn(async move {
                    let guard = locks.acquire(entry.id).await;
                    propagate(&entry, &pool, index.as_ref(), timeout).await;
                    drop(guard);
                    drop(permit);
                    in_flight.finish();
                });
            }

            debug!("Sync propagator worker stopped");
        });

        (
            Self {
                tx,
                in_flight,
                locks,
            },
            handle,
        )
    }

    /// Enqueue an entry for propagation. Never blocks and never fails the caller.
    pub fn schedule(&self, entry: DictionaryEntry) {
        self.in_flight.start();
        if let Err(mpsc::error::SendError(entry)) = self.tx.send(entry) {
            self.in_flight.finish();
            warn!(entry_id = %entry.id, "Sync propagator is not running, entry stays unsynced");
        }
    }

    /// Hold off propagation for `id` until the guard is dropped.
    ///
    /// Deletes take this so a propagation cannot write the document back
    /// between the index delete and the row delete.
    pub async fn lock_entry(&self, id: DictionaryEntryId) -> EntryGuard {
        self.locks.clone().acquire(id).await
    }

    /// Number of scheduled propagations that have not finished yet.
    pub fn pending(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Wait until every scheduled propagation has finished.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.in_flight.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Push the current version of an entry to the index and flip its flag on
/// confirmed success.
///
/// `entry` is the snapshot that was scheduled. Postgres is read again first:
/// if the row has moved on, the newer version has its own propagation queued
/// and this one does nothing; if the row is gone, its document is removed.
pub async fn propagate(
    entry: &DictionaryEntry,
    pool: &PgPool,
    index: &dyn BaseSearchIndex,
    timeout: Duration,
) -> SyncOutcome {
    let current = match DictionaryEntry::find_by_id(entry.id, pool).await {
        Ok(Some(current)) => current,
        Ok(None) => {
            debug!(entry_id = %entry.id, "Entry deleted before propagation");
            remove_document(entry.id, index, timeout).await;
            return SyncOutcome::Stale;
        }
        Err(e) => {
            error!(entry_id = %entry.id, error = %e, "Failed to load entry for propagation");
            return SyncOutcome::LoadFailed;
        }
    };

    if current.updated_at != entry.updated_at {
        debug!(entry_id = %entry.id, "Entry changed since it was scheduled, skipping old version");
        return SyncOutcome::Stale;
    }

    let document = SearchDocument::from(&current);

    match tokio::time::timeout(timeout, index.upsert(&document)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(entry_id = %current.id, word = %current.word, error = %e, "Search index upsert failed");
            return SyncOutcome::IndexFailed;
        }
        Err(_) => {
            error!(entry_id = %current.id, word = %current.word, timeout_ms = timeout.as_millis() as u64, "Search index upsert timed out");
            return SyncOutcome::IndexFailed;
        }
    }

    match DictionaryEntry::mark_synced(current.id, current.updated_at, pool).await {
        Ok(true) => {
            debug!(entry_id = %current.id, "Entry synced to search index");
            SyncOutcome::Synced
        }
        Ok(false) => {
            debug!(entry_id = %current.id, "Entry changed during propagation, leaving unsynced");
            // A row delete that bypassed the entry lock would otherwise leave a ghost document.
            if let Ok(None) = DictionaryEntry::find_by_id(current.id, pool).await {
                remove_document(current.id, index, timeout).await;
            }
            SyncOutcome::Stale
        }
        Err(e) => {
            error!(entry_id = %current.id, error = %e, "Failed to mark entry as synced");
            SyncOutcome::FlagUpdateFailed
        }
    }
}

async fn remove_document(id: DictionaryEntryId, index: &dyn BaseSearchIndex, timeout: Duration) {
    match tokio::time::timeout(timeout, index.delete(id)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(entry_id = %id, error = %e, "Failed to remove document for deleted entry")
        }
        Err(_) => warn!(entry_id = %id, "Timed out removing document for deleted entry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_flight_notifies_when_drained() {
        let in_flight = Arc::new(InFlight::default());
        in_flight.start();
        in_flight.start();

        let waiter = {
            let in_flight = in_flight.clone();
            tokio::spawn(async move {
                loop {
                    let notified = in_flight.idle.notified();
                    if in_flight.count.load(Ordering::SeqCst) == 0 {
                        return;
                    }
                    notified.await;
                }
            })
        };

        in_flight.finish();
        in_flight.finish();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake once drained")
            .unwrap();
    }

    #[tokio::test]
    async fn test_entry_lock_serializes_same_id() {
        let locks = Arc::new(EntryLocks::default());
        let id = DictionaryEntryId::new();

        let first = locks.clone().acquire(id).await;
        let waiter = tokio::spawn(locks.clone().acquire(id));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "second holder must wait for the first");

        // Other ids are not blocked.
        let other = tokio::time::timeout(
            Duration::from_secs(1),
            locks.clone().acquire(DictionaryEntryId::new()),
        )
        .await
        .expect("unrelated entry should lock immediately");
        drop(other);

        drop(first);
        let second = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should get the lock once released")
            .unwrap();
        drop(second);

        assert!(locks.map().is_empty());
    }
}
