use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use stockroom_core::{Quantity, StockroomError, StockroomResult};

use crate::catalog::CatalogStorage;
use crate::part::{AutofillEntry, NewPart, PartRecord};

/// Catalog operations over a whole-table storage backend.
///
/// Every mutation runs load → mutate → save under one write lock, so two
/// concurrent writers cannot lose each other's update. Reads go straight to
/// storage and never take the lock.
#[derive(Debug)]
pub struct InventoryStore<S>
where
    S: CatalogStorage,
{
    storage: S,
    write_lock: Mutex<()>,
}

impl<S> InventoryStore<S>
where
    S: CatalogStorage,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the full catalog.
    pub fn load(&self) -> StockroomResult<Vec<PartRecord>> {
        let parts = self.storage.load()?;
        tracing::debug!(parts = parts.len(), "catalog loaded");
        Ok(parts)
    }

    /// Full listing, in storage order.
    pub fn list(&self) -> StockroomResult<Vec<PartRecord>> {
        self.load()
    }

    /// First row whose Part Number equals `part_number` exactly.
    pub fn find_by_part_number(&self, part_number: &str) -> StockroomResult<Option<PartRecord>> {
        Ok(self.load()?.into_iter().find(|p| p.part_number == part_number))
    }

    /// First row whose Part Name equals `part_name` exactly.
    pub fn find_by_part_name(&self, part_name: &str) -> StockroomResult<Option<PartRecord>> {
        Ok(self.load()?.into_iter().find(|p| p.part_name == part_name))
    }

    /// Point lookup by number or name.
    ///
    /// A non-empty Part Number wins; the name is only consulted when no number
    /// is given. Neither supplied yields `None`.
    pub fn lookup(
        &self,
        part_number: Option<&str>,
        part_name: Option<&str>,
    ) -> StockroomResult<Option<PartRecord>> {
        match (non_empty(part_number), non_empty(part_name)) {
            (Some(number), _) => self.find_by_part_number(number),
            (None, Some(name)) => self.find_by_part_name(name),
            (None, None) => Ok(None),
        }
    }

    /// Add or restock a part.
    ///
    /// Existing part: only Quantity accumulates; name, threshold, unit, machine
    /// and note keep their stored values. New part: created verbatim from
    /// `new_part`.
    pub fn upsert_add(&self, new_part: NewPart) -> StockroomResult<PartRecord> {
        if new_part.part_number.trim().is_empty() {
            return Err(StockroomError::validation("part number is required"));
        }

        let _guard = self.lock_writes()?;
        let mut parts = self.load()?;

        let updated = match parts.iter_mut().find(|p| p.part_number == new_part.part_number) {
            Some(existing) => {
                existing.quantity = Some(existing.available().checked_add(new_part.quantity)?);
                existing.clone()
            }
            None => {
                let created = new_part.into_record();
                parts.push(created.clone());
                created
            }
        };

        self.storage.save(&parts)?;
        tracing::info!(
            part_number = %updated.part_number,
            quantity = %updated.available(),
            "part added"
        );
        Ok(updated)
    }

    /// Withdraw `quantity` units of a part.
    ///
    /// Issuing exactly the current stock is allowed and leaves zero. Asking for
    /// more is rejected and nothing is written.
    pub fn issue(&self, part_number: &str, quantity: Quantity) -> StockroomResult<PartRecord> {
        if part_number.trim().is_empty() {
            return Err(StockroomError::validation("part number is required"));
        }
        let quantity = quantity.ensure_positive()?;

        let _guard = self.lock_writes()?;
        let mut parts = self.load()?;

        let part = parts
            .iter_mut()
            .find(|p| p.part_number == part_number)
            .ok_or_else(|| StockroomError::not_found(part_number))?;

        let available = part.available();
        let remaining = match available.checked_sub(quantity) {
            Some(remaining) => remaining,
            None => {
                tracing::warn!(
                    part_number,
                    requested = %quantity,
                    available = %available,
                    "issue rejected: insufficient stock"
                );
                return Err(StockroomError::insufficient_stock(
                    part_number,
                    quantity.get(),
                    available.get(),
                ));
            }
        };

        part.quantity = Some(remaining);
        let updated = part.clone();

        self.storage.save(&parts)?;
        tracing::info!(part_number, issued = %quantity, remaining = %remaining, "part issued");
        Ok(updated)
    }

    /// Parts below their reorder threshold ("to order" list).
    pub fn low_stock(&self) -> StockroomResult<Vec<PartRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|p| p.is_low_stock() == Some(true))
            .collect())
    }

    /// Case-insensitive search over Part Number, Part Name and Machine.
    ///
    /// A blank keyword returns nothing rather than everything.
    pub fn search(&self, keyword: &str) -> StockroomResult<Vec<PartRecord>> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .load()?
            .into_iter()
            .filter(|p| p.matches_keyword(&needle))
            .collect())
    }

    /// Distinct form templates, first occurrence wins.
    pub fn autofill(&self) -> StockroomResult<Vec<AutofillEntry>> {
        let mut seen = HashSet::new();
        Ok(self
            .load()?
            .iter()
            .map(PartRecord::autofill_entry)
            .filter(|entry| seen.insert(entry.clone()))
            .collect())
    }

    fn lock_writes(&self) -> StockroomResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StockroomError::storage("catalog write lock poisoned"))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn store() -> InventoryStore<InMemoryCatalog> {
        InventoryStore::new(InMemoryCatalog::new())
    }

    fn new_part(number: &str, name: &str, quantity: u64, min_stock: Option<u64>) -> NewPart {
        NewPart {
            part_number: number.to_string(),
            part_name: name.to_string(),
            quantity: Quantity::new(quantity),
            min_stock: min_stock.map(Quantity::new),
            unit: "pcs".to_string(),
            machine: "M1".to_string(),
            note: String::new(),
        }
    }

    fn quantity_of(store: &InventoryStore<InMemoryCatalog>, number: &str) -> Option<Quantity> {
        store.find_by_part_number(number).unwrap().unwrap().quantity
    }

    #[test]
    fn empty_catalog_loads_as_empty() {
        assert!(store().load().unwrap().is_empty());
    }

    #[test]
    fn add_creates_a_record_verbatim() {
        let store = store();
        let created = store.upsert_add(new_part("P1", "Bolt", 10, Some(5))).unwrap();

        assert_eq!(created.quantity, Some(Quantity::new(10)));
        assert_eq!(created.min_stock, Some(Quantity::new(5)));
        assert_eq!(store.load().unwrap(), vec![created]);
    }

    #[test]
    fn repeated_adds_accumulate_quantity_only() {
        let store = store();
        store.upsert_add(new_part("X", "Widget", 5, Some(2))).unwrap();

        let mut second = new_part("X", "Renamed widget", 3, Some(50));
        second.unit = "kg".to_string();
        second.machine = "M9".to_string();
        second.note = "ignored".to_string();
        let updated = store.upsert_add(second).unwrap();

        assert_eq!(updated.quantity, Some(Quantity::new(8)));
        assert_eq!(updated.part_name, "Widget");
        assert_eq!(updated.min_stock, Some(Quantity::new(2)));
        assert_eq!(updated.unit, "pcs");
        assert_eq!(updated.machine, "M1");
        assert_eq!(updated.note, "");
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn add_rejects_blank_part_number() {
        let err = store().upsert_add(new_part("  ", "Bolt", 1, None)).unwrap_err();
        assert!(matches!(err, StockroomError::Validation(_)));
    }

    #[test]
    fn add_onto_non_numeric_stock_starts_from_zero() {
        let mut legacy = new_part("L1", "Legacy", 0, None).into_record();
        legacy.quantity = None;
        let store = InventoryStore::new(InMemoryCatalog::with_parts(vec![legacy]));

        let updated = store.upsert_add(new_part("L1", "Legacy", 4, None)).unwrap();
        assert_eq!(updated.quantity, Some(Quantity::new(4)));
    }

    #[test]
    fn issue_decrements_stock() {
        let store = store();
        store.upsert_add(new_part("P1", "Bolt", 10, None)).unwrap();

        let updated = store.issue("P1", Quantity::new(4)).unwrap();
        assert_eq!(updated.quantity, Some(Quantity::new(6)));
        assert_eq!(quantity_of(&store, "P1"), Some(Quantity::new(6)));
    }

    #[test]
    fn issue_of_entire_stock_reaches_zero() {
        let store = store();
        store.upsert_add(new_part("P1", "Bolt", 7, None)).unwrap();

        let updated = store.issue("P1", Quantity::new(7)).unwrap();
        assert_eq!(updated.quantity, Some(Quantity::ZERO));
    }

    #[test]
    fn issue_beyond_stock_is_rejected_and_leaves_stock_unchanged() {
        let store = store();
        store.upsert_add(new_part("P1", "Bolt", 6, None)).unwrap();

        let err = store.issue("P1", Quantity::new(100)).unwrap_err();
        assert_eq!(err, StockroomError::insufficient_stock("P1", 100, 6));
        assert_eq!(quantity_of(&store, "P1"), Some(Quantity::new(6)));
    }

    #[test]
    fn issue_of_unknown_part_is_not_found() {
        let err = store().issue("NOPE", Quantity::new(1)).unwrap_err();
        assert_eq!(err, StockroomError::not_found("NOPE"));
    }

    #[test]
    fn issue_of_zero_is_a_validation_error() {
        let store = store();
        store.upsert_add(new_part("P1", "Bolt", 6, None)).unwrap();
        let err = store.issue("P1", Quantity::ZERO).unwrap_err();
        assert!(matches!(err, StockroomError::Validation(_)));
    }

    #[test]
    fn failed_save_surfaces_as_storage_error() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let store = InventoryStore::new(catalog.clone());
        store.upsert_add(new_part("P1", "Bolt", 6, None)).unwrap();

        catalog.set_fail_writes(true);
        let err = store.issue("P1", Quantity::new(1)).unwrap_err();
        assert!(matches!(err, StockroomError::Storage(_)));

        catalog.set_fail_writes(false);
        assert_eq!(store.find_by_part_number("P1").unwrap().unwrap().quantity, Some(Quantity::new(6)));
    }

    #[test]
    fn lookup_prefers_part_number_over_name() {
        let store = store();
        store.upsert_add(new_part("P1", "Bolt", 1, None)).unwrap();
        store.upsert_add(new_part("P2", "Nut", 1, None)).unwrap();

        let found = store.lookup(Some("P1"), Some("Nut")).unwrap().unwrap();
        assert_eq!(found.part_number, "P1");

        let by_name = store.lookup(Some(""), Some("Nut")).unwrap().unwrap();
        assert_eq!(by_name.part_number, "P2");

        assert_eq!(store.lookup(None, None).unwrap(), None);
        assert_eq!(store.lookup(Some("P9"), Some("Nut")).unwrap(), None);
    }

    #[test]
    fn find_by_name_returns_first_match() {
        let store = store();
        store.upsert_add(new_part("A", "Gasket", 1, None)).unwrap();
        store.upsert_add(new_part("B", "Gasket", 2, None)).unwrap();

        assert_eq!(store.find_by_part_name("Gasket").unwrap().unwrap().part_number, "A");
        assert_eq!(store.find_by_part_name("gasket").unwrap(), None);
    }

    #[test]
    fn low_stock_excludes_rows_without_threshold() {
        let store = store();
        store.upsert_add(new_part("LOW", "Low", 1, Some(5))).unwrap();
        store.upsert_add(new_part("OK", "Ok", 5, Some(5))).unwrap();
        store.upsert_add(new_part("NONE", "None", 0, None)).unwrap();

        let low: Vec<_> = store.low_stock().unwrap().into_iter().map(|p| p.part_number).collect();
        assert_eq!(low, vec!["LOW".to_string()]);
    }

    #[test]
    fn search_is_opt_in_and_case_insensitive() {
        let store = store();
        store.upsert_add(new_part("HB-8", "Hex Bolt", 1, None)).unwrap();
        let mut other = new_part("BR-1", "Bearing", 1, None);
        other.machine = "Lathe HB".to_string();
        store.upsert_add(other).unwrap();
        store.upsert_add(new_part("SP-2", "Spring", 1, None)).unwrap();

        assert!(store.search("").unwrap().is_empty());
        assert!(store.search("   ").unwrap().is_empty());

        let hits: Vec<_> = store.search(" hb ").unwrap().into_iter().map(|p| p.part_number).collect();
        assert_eq!(hits, vec!["HB-8".to_string(), "BR-1".to_string()]);

        let by_name: Vec<_> = store.search("SPRING").unwrap().into_iter().map(|p| p.part_number).collect();
        assert_eq!(by_name, vec!["SP-2".to_string()]);
    }

    #[test]
    fn autofill_deduplicates_templates() {
        let first = new_part("A", "Gasket", 1, Some(2)).into_record();
        let mut dup = first.clone();
        dup.quantity = Some(Quantity::new(99));
        let other = new_part("B", "Seal", 1, None).into_record();
        let store = InventoryStore::new(InMemoryCatalog::with_parts(vec![first, dup, other]));

        let entries = store.autofill().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].part_number, "A");
        assert_eq!(entries[1].part_number, "B");
    }

    #[test]
    fn stockroom_scenario() {
        let store = store();
        let mut bolt = new_part("P1", "Bolt", 10, Some(5));
        bolt.machine = "M1".to_string();
        store.upsert_add(bolt).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);

        store.issue("P1", Quantity::new(4)).unwrap();
        assert_eq!(quantity_of(&store, "P1"), Some(Quantity::new(6)));

        assert!(store.issue("P1", Quantity::new(100)).is_err());
        assert_eq!(quantity_of(&store, "P1"), Some(Quantity::new(6)));
        assert!(store.low_stock().unwrap().is_empty());

        store.issue("P1", Quantity::new(2)).unwrap();
        assert_eq!(quantity_of(&store, "P1"), Some(Quantity::new(4)));
        let low = store.low_stock().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].part_number, "P1");
    }

    #[test]
    fn concurrent_adds_do_not_lose_updates() {
        let store = Arc::new(store());
        store.upsert_add(new_part("C", "Clip", 0, None)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.upsert_add(new_part("C", "Clip", 1, None)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(quantity_of(&store, "C"), Some(Quantity::new(200)));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Property: repeated adds of one part number sum exactly.
            #[test]
            fn adds_accumulate_exactly(deltas in prop::collection::vec(0u64..10_000u64, 1..20)) {
                let store = store();
                for d in &deltas {
                    store.upsert_add(new_part("X", "Widget", *d, None)).unwrap();
                }
                let total: u64 = deltas.iter().sum();
                prop_assert_eq!(quantity_of(&store, "X"), Some(Quantity::new(total)));
                prop_assert_eq!(store.load().unwrap().len(), 1);
            }

            /// Property: an issue either succeeds with an exact decrement or fails
            /// leaving stock untouched.
            #[test]
            fn issue_never_goes_negative(stock in 0u64..1_000u64, requested in 1u64..2_000u64) {
                let store = store();
                store.upsert_add(new_part("X", "Widget", stock, None)).unwrap();

                match store.issue("X", Quantity::new(requested)) {
                    Ok(updated) => {
                        prop_assert!(requested <= stock);
                        prop_assert_eq!(updated.quantity, Some(Quantity::new(stock - requested)));
                    }
                    Err(err) => {
                        prop_assert!(requested > stock);
                        prop_assert_eq!(err, StockroomError::insufficient_stock("X", requested, stock));
                        prop_assert_eq!(quantity_of(&store, "X"), Some(Quantity::new(stock)));
                    }
                }
            }

            /// Property: low stock never reports a row without a numeric threshold.
            #[test]
            fn low_stock_ignores_absent_thresholds(
                rows in prop::collection::vec((0u64..20u64, prop::option::of(0u64..20u64)), 0..30)
            ) {
                let parts: Vec<_> = rows
                    .iter()
                    .enumerate()
                    .map(|(i, (q, min))| new_part(&format!("P{i}"), "Part", *q, *min).into_record())
                    .collect();
                let store = InventoryStore::new(InMemoryCatalog::with_parts(parts));

                for part in store.low_stock().unwrap() {
                    prop_assert!(part.min_stock.is_some());
                    prop_assert!(part.available() < part.min_stock.unwrap());
                }
            }
        }
    }
}
