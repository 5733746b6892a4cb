//! Domain models for the back office.
//!
//! Row types live next to their queries in [`crate::db`]; these are the
//! validated types handlers and templates work with.

pub mod catalog;
pub mod geography;
pub mod logistics;
pub mod people;
pub mod sales;
pub mod session;

pub use catalog::{Lookup, Product, ProductDetail, ProductVariant};
pub use geography::{City, Country, Province};
pub use logistics::{Shipment, Vehicle, VehicleDetail, VehicleDocument};
pub use people::{Customer, Employee, User, UserCredentials};
pub use sales::{Order, OrderDetail, OrderItem};
pub use session::{CurrentUser, UiState, session_keys};
