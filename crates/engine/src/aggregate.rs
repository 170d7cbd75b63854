//! Hierarchical rollups over normalized stock records.
//!
//! Aggregates are pure, recomputed projections of the current record set.
//! They are never independently mutated; anything that changes the records
//! re-derives them from scratch. Only sums and counts are computed here,
//! never rates or divisions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use stockdeck_core::{LocationCode, ProductCode, SkuCode};

use crate::record::{StockRecord, UNKNOWN_COLOR, UNKNOWN_SIZE};

/// Product-level rollup.
///
/// Invariant: `total_quantity` equals the sum of `quantity` over all
/// in-stock records of the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAggregate {
    pub product_code: ProductCode,
    pub total_quantity: u64,
    pub distinct_sku_count: usize,
    pub distinct_color_count: usize,
    pub distinct_location_count: usize,
}

/// Per-(product, color) rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAggregate {
    pub product_code: ProductCode,
    pub color: String,
    pub total_quantity: u64,
    pub distinct_sku_count: usize,
}

/// One location's share of a SKU's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStock {
    pub location_code: LocationCode,
    pub quantity: u32,
}

/// SKU-level rollup.
///
/// `locations` holds only in-stock entries, sorted ascending by quantity
/// (ties broken by location code) so that low-stock locations surface
/// first and are consumed first by the allocator. Invariant:
/// `total_quantity == Σ locations[].quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuAggregate {
    pub sku_code: SkuCode,
    pub total_quantity: u64,
    pub locations: Vec<LocationStock>,
}

/// A color/size combination implied by a product's other variants but
/// absent from the current record set. Never physically stored, only
/// derived on demand; quantity is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticZeroSku {
    pub sku_code: SkuCode,
    pub product_code: ProductCode,
    pub color: String,
    pub size: String,
    pub quantity: u32,
}

#[derive(Default)]
struct ProductAccumulator {
    total: u64,
    skus: BTreeSet<SkuCode>,
    colors: BTreeSet<String>,
    locations: BTreeSet<LocationCode>,
}

/// Group records by product code.
///
/// Sums and distinct counts consider only in-stock records, so a product
/// key present solely through zero-quantity records yields an all-zero
/// aggregate rather than being dropped or treated as an error. Output is
/// sorted by product code.
pub fn aggregate_by_product(records: &[StockRecord]) -> Vec<ProductAggregate> {
    let mut groups: BTreeMap<ProductCode, ProductAccumulator> = BTreeMap::new();

    for record in records {
        let acc = groups.entry(record.product_code.clone()).or_default();
        if !record.in_stock() {
            continue;
        }
        acc.total += u64::from(record.quantity);
        if !record.sku_code.is_blank() {
            acc.skus.insert(record.sku_code.clone());
        }
        if !record.color.trim().is_empty() {
            acc.colors.insert(record.color.clone());
        }
        if !record.location_code.is_blank() {
            acc.locations.insert(record.location_code.clone());
        }
    }

    groups
        .into_iter()
        .map(|(product_code, acc)| ProductAggregate {
            product_code,
            total_quantity: acc.total,
            distinct_sku_count: acc.skus.len(),
            distinct_color_count: acc.colors.len(),
            distinct_location_count: acc.locations.len(),
        })
        .collect()
}

/// Group one product's records by color, sorted by color.
pub fn aggregate_by_color(records: &[StockRecord], product_code: &ProductCode) -> Vec<ColorAggregate> {
    let mut groups: BTreeMap<String, (u64, BTreeSet<SkuCode>)> = BTreeMap::new();

    for record in records {
        if record.product_code != *product_code {
            continue;
        }
        let (total, skus) = groups.entry(record.color.clone()).or_default();
        if !record.in_stock() {
            continue;
        }
        *total += u64::from(record.quantity);
        if !record.sku_code.is_blank() {
            skus.insert(record.sku_code.clone());
        }
    }

    groups
        .into_iter()
        .map(|(color, (total_quantity, skus))| ColorAggregate {
            product_code: product_code.clone(),
            color,
            total_quantity,
            distinct_sku_count: skus.len(),
        })
        .collect()
}

/// Group records by SKU code, sorted by SKU code.
///
/// Several records for the same (SKU, location) pair merge into one
/// location entry.
pub fn aggregate_by_sku(records: &[StockRecord]) -> Vec<SkuAggregate> {
    let mut groups: BTreeMap<SkuCode, BTreeMap<LocationCode, u32>> = BTreeMap::new();

    for record in records {
        let locations = groups.entry(record.sku_code.clone()).or_default();
        if !record.in_stock() {
            continue;
        }
        let entry = locations.entry(record.location_code.clone()).or_default();
        *entry = entry.saturating_add(record.quantity);
    }

    groups
        .into_iter()
        .map(|(sku_code, by_location)| {
            let mut locations: Vec<LocationStock> = by_location
                .into_iter()
                .map(|(location_code, quantity)| LocationStock {
                    location_code,
                    quantity,
                })
                .collect();
            locations.sort_by(|a, b| {
                a.quantity
                    .cmp(&b.quantity)
                    .then_with(|| a.location_code.cmp(&b.location_code))
            });
            let total_quantity = locations.iter().map(|l| u64::from(l.quantity)).sum();
            SkuAggregate {
                sku_code,
                total_quantity,
                locations,
            }
        })
        .collect()
}

/// Detect assortment gaps for one product.
///
/// The universal size set is every size observed across *any* color of the
/// product (zero-quantity records count as observed). For each color, each
/// universal size that color lacks synthesizes a zero-stock SKU coded
/// `{product}-{color}-{size}`. Placeholder colors and sizes are not part
/// of the assortment grid. An existing SKU code is never duplicated, even
/// one currently present only as a real zero-quantity record.
pub fn find_assortment_gaps(
    product_code: &ProductCode,
    records: &[StockRecord],
) -> Vec<SyntheticZeroSku> {
    let mut universal_sizes: BTreeSet<&str> = BTreeSet::new();
    let mut sizes_by_color: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut existing_skus: BTreeSet<&SkuCode> = BTreeSet::new();

    for record in records {
        if record.product_code != *product_code {
            continue;
        }
        existing_skus.insert(&record.sku_code);
        if record.color == UNKNOWN_COLOR || record.size == UNKNOWN_SIZE {
            continue;
        }
        universal_sizes.insert(&record.size);
        sizes_by_color
            .entry(&record.color)
            .or_default()
            .insert(&record.size);
    }

    let mut gaps = Vec::new();
    for (color, sizes) in &sizes_by_color {
        for size in &universal_sizes {
            if sizes.contains(size) {
                continue;
            }
            let sku_code = SkuCode::compose(product_code, color, size);
            if existing_skus.contains(&sku_code) {
                continue;
            }
            gaps.push(SyntheticZeroSku {
                sku_code,
                product_code: product_code.clone(),
                color: (*color).to_string(),
                size: (*size).to_string(),
                quantity: 0,
            });
        }
    }
    gaps
}
