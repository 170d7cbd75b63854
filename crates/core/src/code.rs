//! Strongly-typed codes used across the domain.
//!
//! Codes are opaque, backend-assigned strings (not UUIDs): product codes,
//! composite SKU codes and warehouse location codes.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Delimiter used in composite SKU codes: `{product}-{color}-{size}`.
pub const SKU_DELIMITER: char = '-';

/// Identifier of a product family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

/// Identifier of a specific color+size variant (composite code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuCode(String);

/// Identifier of a physical stock location (shelf, bin, zone).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationCode(String);

macro_rules! impl_code_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the code carries no usable content.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(DomainError::invalid_code(concat!($name, " cannot be empty")));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_code_newtype!(ProductCode, "ProductCode");
impl_code_newtype!(SkuCode, "SkuCode");
impl_code_newtype!(LocationCode, "LocationCode");

/// Segments of a composite SKU code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuParts {
    pub product_code: ProductCode,
    pub color: String,
    pub size: String,
}

impl SkuCode {
    /// Build a composite code from its segments.
    pub fn compose(product_code: &ProductCode, color: &str, size: &str) -> Self {
        Self(format!(
            "{}{SKU_DELIMITER}{color}{SKU_DELIMITER}{size}",
            product_code.as_str()
        ))
    }

    /// Split the composite code into `[product_code, color, size]`.
    ///
    /// Colors may themselves contain the delimiter, so the first segment is
    /// the product code, the last is the size, and everything in between
    /// re-joins as the color. Returns `None` for codes with fewer than three
    /// segments; callers fall back to placeholders.
    pub fn parts(&self) -> Option<SkuParts> {
        let segments: Vec<&str> = self.0.split(SKU_DELIMITER).collect();
        if segments.len() < 3 {
            return None;
        }
        let product = segments[0];
        let size = segments[segments.len() - 1];
        let color = segments[1..segments.len() - 1].join(&SKU_DELIMITER.to_string());
        if product.is_empty() || color.is_empty() || size.is_empty() {
            return None;
        }
        Some(SkuParts {
            product_code: ProductCode::new(product),
            color,
            size: size.to_string(),
        })
    }
}
