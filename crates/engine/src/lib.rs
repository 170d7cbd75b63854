//! Inventory aggregation, faceted-filtering and allocation engine.
//!
//! This crate contains the warehouse client's domain logic, implemented
//! purely as deterministic functions over an in-memory record set (no IO,
//! no HTTP, no storage). Data flows one way: raw payload entries are
//! normalized into [`record::StockRecord`]s, rollups and facet option
//! lists are derived from them, and server-confirmed mutations flow back
//! through [`store::RecordStore`] as absolute-quantity patches from which
//! everything is re-derived.

pub mod aggregate;
pub mod allocator;
pub mod facet;
pub mod record;
pub mod store;

pub use aggregate::{
    ColorAggregate, LocationStock, ProductAggregate, SkuAggregate, SyntheticZeroSku,
    aggregate_by_color, aggregate_by_product, aggregate_by_sku, find_assortment_gaps,
};
pub use allocator::{Allocation, AllocationRequest, AllocationResult, allocate};
pub use facet::{CountRange, Facet, FacetState, compute_options, filter};
pub use record::{RawStockEntry, StockRecord, UNKNOWN_COLOR, UNKNOWN_SIZE, normalize};
pub use store::{RecordStore, SnapshotToken, StockPatch};
