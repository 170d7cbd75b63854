//! Normalized stock records.
//!
//! Backend payloads come in two shapes (location-centric item lists and
//! product-centric color/size trees) with inconsistently populated fields.
//! Normalization happens exactly once, at ingestion; downstream code only
//! ever reads the normalized fields.

use serde::{Deserialize, Serialize};

use stockdeck_core::{LocationCode, ProductCode, SkuCode};

/// Placeholder color for entries where neither an explicit color field nor
/// a parseable SKU code is available.
pub const UNKNOWN_COLOR: &str = "未知颜色";

/// Placeholder size, same fallback rule as [`UNKNOWN_COLOR`].
pub const UNKNOWN_SIZE: &str = "未知尺码";

/// One stock entry as extracted from a raw backend payload, before any
/// field derivation has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStockEntry {
    pub sku_code: String,
    pub product_code: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub location_code: String,
    pub quantity: i64,
    pub image_ref: Option<String>,
}

/// The atomic unit of the engine: one SKU's stock at one location.
///
/// Immutable once normalized; the only sanctioned mutation is the record
/// store overwriting `quantity` with a server-returned absolute value.
/// Zero-quantity records are retained (assortment-gap detection needs
/// them) but excluded from every "has stock" rollup by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_code: ProductCode,
    pub sku_code: SkuCode,
    pub color: String,
    pub size: String,
    pub category: String,
    pub location_code: LocationCode,
    pub quantity: u32,
    pub image_ref: Option<String>,
}

impl StockRecord {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Treat missing and blank-after-trim the same way.
fn explicit(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Normalize one raw entry into a [`StockRecord`].
///
/// Field-derivation precedence, applied uniformly: an explicit field wins
/// over parsing the composite SKU code; if both are absent the literal
/// placeholders are used rather than failing the whole payload. A missing
/// product code falls back to the whole SKU code. Negative quantities
/// clamp to zero.
pub fn normalize_entry(entry: RawStockEntry) -> StockRecord {
    let sku_code = SkuCode::new(entry.sku_code.trim());
    let parts = sku_code.parts();

    let product_code = explicit(&entry.product_code)
        .map(ProductCode::new)
        .or_else(|| parts.as_ref().map(|p| p.product_code.clone()))
        .unwrap_or_else(|| ProductCode::new(sku_code.as_str()));

    let color = explicit(&entry.color)
        .map(str::to_string)
        .or_else(|| parts.as_ref().map(|p| p.color.clone()))
        .unwrap_or_else(|| UNKNOWN_COLOR.to_string());

    let size = explicit(&entry.size)
        .map(str::to_string)
        .or_else(|| parts.as_ref().map(|p| p.size.clone()))
        .unwrap_or_else(|| UNKNOWN_SIZE.to_string());

    let category = explicit(&entry.category).unwrap_or_default().to_string();

    StockRecord {
        product_code,
        sku_code,
        color,
        size,
        category,
        location_code: LocationCode::new(entry.location_code.trim()),
        quantity: u32::try_from(entry.quantity.max(0)).unwrap_or(u32::MAX),
        image_ref: explicit(&entry.image_ref).map(str::to_string),
    }
}

/// Normalize a batch of raw entries.
pub fn normalize(entries: Vec<RawStockEntry>) -> Vec<StockRecord> {
    entries.into_iter().map(normalize_entry).collect()
}
