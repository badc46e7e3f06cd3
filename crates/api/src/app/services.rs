//! Service wiring: stores, sessions and the add/issue workflows.

use std::sync::Arc;

use chrono::Utc;

use stockroom_auth::{Account, Role, SessionStore, SessionToken};
use stockroom_core::{Clock, Quantity, StockroomError, StockroomResult, SystemClock};
use stockroom_infra::{CsvCatalogFile, CsvLogFile, StockroomConfig};
use stockroom_inventory::{AutofillEntry, CatalogStorage, InventoryStore, NewPart, PartRecord};
use stockroom_transactions::{Action, LogStorage, PartSnapshot, TopIssuedReport, TransactionLog, TransactionRecord};

/// Type-erased catalog backend (CSV in production, in-memory in tests).
pub type DynCatalog = Arc<dyn CatalogStorage>;
/// Type-erased log backend.
pub type DynLog = Arc<dyn LogStorage>;

/// Result of a successful add or issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub part: PartRecord,
    pub transaction: TransactionRecord,
}

/// Everything a request handler needs.
pub struct AppServices {
    inventory: InventoryStore<DynCatalog>,
    log: TransactionLog<DynLog>,
    sessions: Arc<SessionStore>,
    accounts: Vec<Account>,
}

impl AppServices {
    pub fn new(catalog: DynCatalog, log: DynLog, clock: Arc<dyn Clock>, accounts: Vec<Account>) -> Self {
        Self {
            inventory: InventoryStore::new(catalog),
            log: TransactionLog::with_clock(log, clock),
            sessions: Arc::new(SessionStore::new()),
            accounts,
        }
    }

    /// CSV-backed services at the configured locations.
    pub fn from_config(config: &StockroomConfig) -> Self {
        Self::new(
            Arc::new(CsvCatalogFile::new(&config.catalog_path)),
            Arc::new(CsvLogFile::new(&config.log_path)),
            Arc::new(SystemClock),
            config.accounts(),
        )
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Open a session for the first account matching the attempt.
    pub fn login(&self, username: &str, password: &str) -> Option<(SessionToken, Role)> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.credentials.verify(username, password))?;
        let token = self.sessions.open(account.role, Utc::now());
        tracing::info!(username, role = %account.role, "login");
        Some((token, account.role))
    }

    pub fn logout(&self, token: &SessionToken) -> bool {
        self.sessions.close(token)
    }

    /// Add/restock, then record the movement.
    ///
    /// The log entry carries the submitted descriptive fields, even when the
    /// stored row keeps different ones.
    ///
    /// If the catalog write succeeds but the log append fails, the catalog
    /// keeps the new quantity and no transaction exists for it. That gap is
    /// reported as a storage error and logged; it is not repaired.
    pub fn add_part(&self, new_part: NewPart) -> StockroomResult<StockMovement> {
        let delta = new_part.quantity;
        let submitted = PartSnapshot {
            part_number: new_part.part_number.clone(),
            part_name: new_part.part_name.clone(),
            machine: new_part.machine.clone(),
            note: new_part.note.clone(),
        };
        let part = self.inventory.upsert_add(new_part)?;
        let transaction = self.record(Action::Add, submitted, delta)?;
        Ok(StockMovement { part, transaction })
    }

    /// Issue, then record the movement with the stored descriptive fields.
    /// Same logging caveat as [`Self::add_part`].
    pub fn issue_part(&self, part_number: &str, quantity: Quantity) -> StockroomResult<StockMovement> {
        let part = self.inventory.issue(part_number, quantity)?;
        let stored = PartSnapshot {
            part_number: part.part_number.clone(),
            part_name: part.part_name.clone(),
            machine: part.machine.clone(),
            note: part.note.clone(),
        };
        let transaction = self.record(Action::Issue, stored, quantity)?;
        Ok(StockMovement { part, transaction })
    }

    fn record(&self, action: Action, snapshot: PartSnapshot, quantity: Quantity) -> StockroomResult<TransactionRecord> {
        let part_number = snapshot.part_number.clone();
        self.log.append(action.clone(), snapshot, quantity).map_err(|err| {
            tracing::error!(
                action = %action,
                part_number = %part_number,
                quantity = %quantity,
                error = %err,
                "catalog updated but transaction was not logged"
            );
            StockroomError::storage(format!("catalog updated but transaction was not logged: {err}"))
        })
    }

    pub fn parts_list(&self) -> StockroomResult<Vec<PartRecord>> {
        self.inventory.list()
    }

    pub fn parts_lookup(&self, part_number: Option<&str>, part_name: Option<&str>) -> StockroomResult<Option<PartRecord>> {
        self.inventory.lookup(part_number, part_name)
    }

    pub fn parts_search(&self, keyword: &str) -> StockroomResult<Vec<PartRecord>> {
        self.inventory.search(keyword)
    }

    pub fn parts_autofill(&self) -> StockroomResult<Vec<AutofillEntry>> {
        self.inventory.autofill()
    }

    pub fn low_stock(&self) -> StockroomResult<Vec<PartRecord>> {
        self.inventory.low_stock()
    }

    pub fn top_issued(&self) -> StockroomResult<TopIssuedReport> {
        self.log.top_issued()
    }

    pub fn transactions(&self) -> StockroomResult<Vec<TransactionRecord>> {
        self.log.entries()
    }
}

/// Run a service call on the blocking pool.
///
/// Every catalog and log operation reads and rewrites files and may wait on
/// a store's write lock, so handlers never call them on an async worker.
pub async fn run_blocking<T, F>(services: &Arc<AppServices>, call: F) -> StockroomResult<T>
where
    F: FnOnce(&AppServices) -> StockroomResult<T> + Send + 'static,
    T: Send + 'static,
{
    let services = services.clone();
    tokio::task::spawn_blocking(move || call(&services))
        .await
        .map_err(|e| StockroomError::storage(format!("blocking task failed: {e}")))?
}
