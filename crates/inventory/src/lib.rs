//! Inventory catalog: the authoritative current state of parts and quantities.
//!
//! Domain rules live in [`store::InventoryStore`]; durable state is reached only
//! through the [`catalog::CatalogStorage`] seam so file-backed adapters stay in
//! `stockroom-infra`.

pub mod catalog;
pub mod part;
pub mod store;

pub use catalog::{CatalogStorage, InMemoryCatalog};
pub use part::{AutofillEntry, NewPart, PartRecord};
pub use store::InventoryStore;
