//! Wire DTOs for the fixed backend contract.
//!
//! Field names match the backend exactly; everything the contract marks
//! optional (or that real payloads have been observed to omit) is an
//! `Option` so one sloppy row never fails a whole snapshot.

use serde::{Deserialize, Serialize};

/// One location with its item list (`GetLocationInventory` response row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInventory {
    pub location_code: String,
    #[serde(default)]
    pub items: Vec<LocationItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationItem {
    #[serde(default)]
    pub product_code: Option<String>,
    pub sku_code: String,
    #[serde(default)]
    pub sku_color: Option<String>,
    #[serde(default)]
    pub sku_size: Option<String>,
    pub stock_quantity: i64,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Query parameters for `GetAggregatedProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
}

/// `GetAggregatedProducts` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedProducts {
    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product_code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub product_total_quantity: i64,
    pub total_sku_count: i64,
    pub total_color_count: i64,
    pub total_location_count: i64,
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub color: String,
    #[serde(default)]
    pub image_path: Option<String>,
    pub color_total_quantity: i64,
    pub total_sku_count: i64,
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEntry {
    pub sku_size: String,
    pub sku_code: String,
    pub sku_total_quantity: i64,
    #[serde(default)]
    pub locations: Vec<LocationQuantity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationQuantity {
    pub location_code: String,
    pub stock_quantity: i64,
}

/// `AdjustStock`: set the pair to an absolute target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStockRequest {
    pub sku_code: String,
    pub location_code: String,
    pub target_quantity: u32,
}

/// `TransferStock`: move quantity between two locations of one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStockRequest {
    pub sku_code: String,
    pub from_location_code: String,
    pub to_location_code: String,
    pub transfer_quantity: u32,
}

/// `InboundStock`: receive quantity at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundStockRequest {
    pub sku_code: String,
    pub location_code: String,
    pub inbound_quantity: u32,
}

/// `OutboundStock`: ship quantity from a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundStockRequest {
    pub sku_code: String,
    pub location_code: String,
    pub outbound_quantity: u32,
}

/// Post-operation absolute quantities, returned by every mutation
/// endpoint. For transfers these are the destination-side values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub sku_location_quantity: i64,
    pub sku_total_quantity: i64,
}
