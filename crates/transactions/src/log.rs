//! Append-only transaction log over whole-table storage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use stockroom_core::{Clock, Quantity, StockroomError, StockroomResult, SystemClock};

use crate::record::{Action, PartSnapshot, TransactionRecord};
use crate::report::{TopIssuedReport, top_issued};

/// Whole-table storage for the log.
///
/// `load` on storage that does not exist yet returns no entries. `save`
/// replaces the previous contents atomically with respect to `load`.
pub trait LogStorage: Send + Sync {
    fn load(&self) -> StockroomResult<Vec<TransactionRecord>>;
    fn save(&self, entries: &[TransactionRecord]) -> StockroomResult<()>;
}

impl<S> LogStorage for Arc<S>
where
    S: LogStorage + ?Sized,
{
    fn load(&self) -> StockroomResult<Vec<TransactionRecord>> {
        (**self).load()
    }

    fn save(&self, entries: &[TransactionRecord]) -> StockroomResult<()> {
        (**self).save(entries)
    }
}

/// In-memory log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryLog {
    entries: RwLock<Vec<TransactionRecord>>,
    fail_writes: AtomicBool,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<TransactionRecord>) -> Self {
        Self {
            entries: RwLock::new(entries),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent `save` calls fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl LogStorage for InMemoryLog {
    fn load(&self) -> StockroomResult<Vec<TransactionRecord>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StockroomError::storage("log lock poisoned"))?;
        Ok(entries.clone())
    }

    fn save(&self, entries: &[TransactionRecord]) -> StockroomResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StockroomError::storage("log write rejected"));
        }
        let mut stored = self
            .entries
            .write()
            .map_err(|_| StockroomError::storage("log lock poisoned"))?;
        *stored = entries.to_vec();
        Ok(())
    }
}

/// The add/issue history.
///
/// Appends are serialized behind a write lock; entries are never rewritten
/// or removed.
pub struct TransactionLog<S>
where
    S: LogStorage,
{
    storage: S,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl<S> TransactionLog<S>
where
    S: LogStorage,
{
    /// Log stamped with the local wall clock.
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append one entry stamped with the current time.
    ///
    /// Duplicate content is fine; the only failure mode is storage.
    pub fn append(
        &self,
        action: Action,
        part: PartSnapshot,
        quantity: Quantity,
    ) -> StockroomResult<TransactionRecord> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StockroomError::storage("log write lock poisoned"))?;

        let mut entries = self.storage.load()?;
        let record = TransactionRecord::new(self.clock.now(), action, part, quantity);
        entries.push(record.clone());
        self.storage.save(&entries)?;

        tracing::info!(
            action = %record.action,
            part_number = %record.part_number,
            quantity = %record.quantity,
            "transaction logged"
        );
        Ok(record)
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> StockroomResult<Vec<TransactionRecord>> {
        let entries = self.storage.load()?;
        tracing::debug!(entries = entries.len(), "log loaded");
        Ok(entries)
    }

    /// Issued totals per (Part Number, Part Name).
    ///
    /// An absent log or one without Issue rows yields an empty report.
    pub fn top_issued(&self) -> StockroomResult<TopIssuedReport> {
        Ok(top_issued(&self.entries()?))
    }
}

impl<S> core::fmt::Debug for TransactionLog<S>
where
    S: LogStorage + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransactionLog")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}
