//! Flattening wire payloads into raw stock entries.
//!
//! Both snapshot shapes reduce to the same flat entry list; all field
//! fallbacks happen later, in the engine's normalizer, never here.

use stockdeck_engine::RawStockEntry;

use crate::dto::{AggregatedProducts, LocationInventory};

/// Flatten the location-centric payload.
pub fn location_inventory_entries(payload: &[LocationInventory]) -> Vec<RawStockEntry> {
    let mut entries = Vec::new();
    for location in payload {
        for item in &location.items {
            entries.push(RawStockEntry {
                sku_code: item.sku_code.clone(),
                product_code: item.product_code.clone(),
                color: item.sku_color.clone(),
                size: item.sku_size.clone(),
                category: None,
                location_code: location.location_code.clone(),
                quantity: item.stock_quantity,
                image_ref: item.image_path.clone(),
            });
        }
    }
    entries
}

/// Flatten the product-centric payload: one entry per
/// (product, color, size, location) leaf.
pub fn aggregated_product_entries(payload: &AggregatedProducts) -> Vec<RawStockEntry> {
    let mut entries = Vec::new();
    for product in &payload.products {
        for color in &product.colors {
            for size in &color.sizes {
                for location in &size.locations {
                    entries.push(RawStockEntry {
                        sku_code: size.sku_code.clone(),
                        product_code: Some(product.product_code.clone()),
                        color: Some(color.color.clone()),
                        size: Some(size.sku_size.clone()),
                        category: None,
                        location_code: location.location_code.clone(),
                        quantity: location.stock_quantity,
                        image_ref: color.image_path.clone(),
                    });
                }
            }
        }
    }
    entries
}
