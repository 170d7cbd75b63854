//! `stockdeck-client` — backend contract and browsing session.
//!
//! The backend inventory database is an opaque authoritative source,
//! consumed through a fixed contract: two snapshot queries and four
//! mutation endpoints that all return post-operation absolute quantities.
//! This crate holds the wire DTOs, an async [`InventoryApi`] trait with a
//! `reqwest` implementation, and [`StockSession`], which ties local
//! validation, the API call and reconciliation together.

pub mod api;
pub mod convert;
pub mod dto;
pub mod error;
pub mod session;

pub use api::{HttpInventoryApi, InventoryApi};
pub use error::{ClientError, ClientResult};
pub use session::StockSession;
