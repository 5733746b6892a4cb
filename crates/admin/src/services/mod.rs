//! Business logic services for the admin server.
//!
//! # Services
//!
//! - `auth` - password login, JWT issuing and verification

pub mod auth;

pub use auth::{AuthError, AuthService, Claims, JwtService};
