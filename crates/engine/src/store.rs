//! Record store: snapshot generations and server-authoritative
//! reconciliation.
//!
//! The flat record list is the single source of truth. Every derived value
//! is recomputed from it on change rather than patched incrementally,
//! which removes both compounding arithmetic drift and the read/write
//! races incremental mutation would introduce. Single-threaded by design;
//! projections take `&mut self` only to maintain the memo.

use chrono::{DateTime, Utc};

use stockdeck_core::{LocationCode, SkuCode};

use crate::aggregate::{self, ProductAggregate, SkuAggregate};
use crate::facet::{self, FacetState};
use crate::record::{RawStockEntry, StockRecord, normalize_entry};

/// Handle for one snapshot fetch, issued before the request goes out.
///
/// When several fetches are in flight only the most recently issued one
/// may land; older tokens are rejected at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotToken {
    generation: u64,
}

/// A server-authoritative absolute quantity for one (SKU, location) pair.
///
/// Always an absolute post-operation value returned by the backend, never
/// a locally computed delta. A transfer is modeled as two patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockPatch {
    pub sku_code: SkuCode,
    pub location_code: LocationCode,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
struct ProjectionMemo {
    version: u64,
    state: FacetState,
    filtered: Vec<StockRecord>,
    products: Vec<ProductAggregate>,
}

/// In-memory store of normalized stock records.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<StockRecord>,
    version: u64,
    issued_generation: u64,
    applied_generation: u64,
    fetched_at: Option<DateTime<Utc>>,
    memo: Option<ProjectionMemo>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot. Callers treat records as immutable; the only
    /// sanctioned mutations go through [`apply_snapshot`](Self::apply_snapshot)
    /// and [`apply_patch`](Self::apply_patch).
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    /// Monotonic change counter; bumps on every applied snapshot or patch.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Issue a generation for a snapshot fetch about to be dispatched.
    pub fn begin_fetch(&mut self) -> SnapshotToken {
        self.issued_generation += 1;
        SnapshotToken {
            generation: self.issued_generation,
        }
    }

    /// Replace the record set with a fetched snapshot.
    ///
    /// Last request wins: a response carrying a token older than (or equal
    /// to) the last applied one is discarded, and `false` is returned.
    pub fn apply_snapshot(&mut self, token: SnapshotToken, records: Vec<StockRecord>) -> bool {
        if token.generation <= self.applied_generation {
            tracing::debug!(
                stale = token.generation,
                applied = self.applied_generation,
                "discarding stale snapshot response"
            );
            return false;
        }
        self.applied_generation = token.generation;
        self.records = records;
        self.fetched_at = Some(Utc::now());
        self.bump();
        tracing::debug!(
            generation = self.applied_generation,
            records = self.records.len(),
            "applied snapshot"
        );
        true
    }

    /// Overwrite one (SKU, location) pair with a server-returned absolute
    /// quantity.
    ///
    /// A matching record is overwritten in place; an absent pair with a
    /// positive quantity inserts a record normalized from the SKU code; an
    /// absent pair at zero is a no-op. A pair patched to zero drops its
    /// record, consistent with the in-stock rollup convention.
    pub fn apply_patch(&mut self, patch: &StockPatch) {
        let position = self.records.iter().position(|record| {
            record.sku_code == patch.sku_code && record.location_code == patch.location_code
        });

        match position {
            Some(index) if patch.quantity == 0 => {
                self.records.remove(index);
            }
            Some(index) => {
                self.records[index].quantity = patch.quantity;
            }
            None if patch.quantity > 0 => {
                self.records.push(normalize_entry(RawStockEntry {
                    sku_code: patch.sku_code.as_str().to_string(),
                    location_code: patch.location_code.as_str().to_string(),
                    quantity: i64::from(patch.quantity),
                    ..RawStockEntry::default()
                }));
            }
            None => {}
        }

        self.bump();
        tracing::info!(
            sku = %patch.sku_code,
            location = %patch.location_code,
            quantity = patch.quantity,
            "reconciled stock record"
        );
    }

    /// Reconcile both sides of a confirmed transfer.
    pub fn apply_transfer(&mut self, source: &StockPatch, destination: &StockPatch) {
        self.apply_patch(source);
        self.apply_patch(destination);
    }

    /// SKU rollups over the full record set.
    pub fn sku_aggregates(&self) -> Vec<SkuAggregate> {
        aggregate::aggregate_by_sku(&self.records)
    }

    /// One SKU's rollup, if any record mentions it.
    pub fn sku_aggregate(&self, sku_code: &SkuCode) -> Option<SkuAggregate> {
        self.sku_aggregates()
            .into_iter()
            .find(|sku| sku.sku_code == *sku_code)
    }

    /// Records passing the facet state, memoized by `(version, state)`.
    pub fn filtered(&mut self, state: &FacetState) -> &[StockRecord] {
        &self.projection(state).filtered
    }

    /// Product aggregates over the filtered records, with the state's
    /// count ranges applied, memoized by `(version, state)`.
    pub fn product_aggregates(&mut self, state: &FacetState) -> &[ProductAggregate] {
        &self.projection(state).products
    }

    fn projection(&mut self, state: &FacetState) -> &ProjectionMemo {
        let fresh = self
            .memo
            .as_ref()
            .is_some_and(|memo| memo.version == self.version && memo.state == *state);

        if fresh {
            tracing::debug!(version = self.version, "reusing memoized projection");
        } else {
            let filtered = facet::filter(&self.records, state);
            let products = aggregate::aggregate_by_product(&filtered)
                .into_iter()
                .filter(|product| state.product_passes(product))
                .collect();
            self.memo = Some(ProjectionMemo {
                version: self.version,
                state: state.clone(),
                filtered,
                products,
            });
        }

        self.memo.as_ref().expect("projection memo populated above")
    }

    fn bump(&mut self) {
        self.version += 1;
        self.memo = None;
    }
}
