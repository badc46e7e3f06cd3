//! Catalog storage abstraction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use stockroom_core::{StockroomError, StockroomResult};

use crate::part::PartRecord;

/// Whole-table storage for the part catalog.
///
/// The catalog is always read and written in full. `load` on storage that does
/// not exist yet returns an empty catalog. `save` must replace the previous
/// contents so that a concurrent `load` sees either the old or the new table,
/// never a mix.
pub trait CatalogStorage: Send + Sync {
    fn load(&self) -> StockroomResult<Vec<PartRecord>>;
    fn save(&self, parts: &[PartRecord]) -> StockroomResult<()>;
}

impl<S> CatalogStorage for Arc<S>
where
    S: CatalogStorage + ?Sized,
{
    fn load(&self) -> StockroomResult<Vec<PartRecord>> {
        (**self).load()
    }

    fn save(&self, parts: &[PartRecord]) -> StockroomResult<()> {
        (**self).save(parts)
    }
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    parts: RwLock<Vec<PartRecord>>,
    fail_writes: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(parts: Vec<PartRecord>) -> Self {
        Self {
            parts: RwLock::new(parts),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent `save` calls fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl CatalogStorage for InMemoryCatalog {
    fn load(&self) -> StockroomResult<Vec<PartRecord>> {
        let parts = self
            .parts
            .read()
            .map_err(|_| StockroomError::storage("catalog lock poisoned"))?;
        Ok(parts.clone())
    }

    fn save(&self, parts: &[PartRecord]) -> StockroomResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StockroomError::storage("catalog write rejected"));
        }
        let mut stored = self
            .parts
            .write()
            .map_err(|_| StockroomError::storage("catalog lock poisoned"))?;
        *stored = parts.to_vec();
        Ok(())
    }
}
