//! Error codes and the error type returned by data-access actions.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable numeric error codes, aligned with HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Dependent rows exist, or a unique constraint was hit.
    Conflict,
    Validation,
    Internal,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Validation => 422,
            Self::Internal => 500,
        }
    }

    /// Map a numeric code back; anything unrecognised is `Internal`.
    #[must_use]
    pub const fn from_u16(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Validation,
            _ => Self::Internal,
        }
    }

    #[must_use]
    pub const fn is_server_error(self) -> bool {
        matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u16::deserialize(deserializer).map(Self::from_u16)
    }
}

/// Failure of a data-access action.
///
/// One type covers both "expected" outcomes (not found, has dependents) and
/// unexpected ones; the [`ErrorCode`] tells them apart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionError {
    pub code: ErrorCode,
    pub message: String,
}

impl ActionError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(entity: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{entity} not found"))
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Refusal to delete a row that other rows still reference.
    #[must_use]
    pub fn has_dependents(entity: &str, relation: &str, count: i64) -> Self {
        Self::new(
            ErrorCode::Conflict,
            format!("cannot delete {entity}: {count} {relation} still reference it"),
        )
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Unexpected failure. The message is shown to users, so keep it generic.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, "internal server error")
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.code == ErrorCode::Conflict
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.code == ErrorCode::Unauthorized
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.code == ErrorCode::Internal
    }
}
