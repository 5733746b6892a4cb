//! Tradepost Core - shared types for the Tradepost back office.
//!
//! Used by:
//! - `admin` - the server-rendered admin application and its JSON actions
//! - `cli` - migrations, user management and token issuing
//!
//! Contains only types and pure logic. No I/O happens here; database support is
//! limited to sqlx type mappings behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - typed ids, [`Email`], [`Money`], status and role enums
//! - [`pagination`] - page/limit normalization and [`Page`]
//! - [`search`] - [`SearchTerm`] classification
//! - [`error`] - [`ErrorCode`] and [`ActionError`]
//! - [`envelope`] - the [`Response`] JSON envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod envelope;
pub mod error;
pub mod pagination;
pub mod search;
pub mod types;

pub use envelope::Response;
pub use error::{ActionError, ErrorCode};
pub use pagination::{Page, Pagination};
pub use search::SearchTerm;
pub use types::*;
