//! Domain value types.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
pub use status::{OrderStatus, ShipmentStatus, UnknownVariant, UserRole};
