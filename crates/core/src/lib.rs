//! `stockdeck-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod code;
pub mod error;

pub use code::{LocationCode, ProductCode, SkuCode, SkuParts, SKU_DELIMITER};
pub use error::{DomainError, DomainResult};
