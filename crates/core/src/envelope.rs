//! The JSON envelope every action responds with.

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ErrorCode};
use crate::pagination::Page;

/// `{success, message, code, data, currPage, totalPages}`; absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curr_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl<T> Response<T> {
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            code: None,
            data: Some(data),
            curr_page: None,
            total_pages: None,
        }
    }

    #[must_use]
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    #[must_use]
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            code: Some(code),
            data: None,
            curr_page: None,
            total_pages: None,
        }
    }

    /// Code to use for the HTTP status line; successes are 200.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.code.map_or(200, ErrorCode::as_u16)
    }
}

impl<T> Response<Vec<T>> {
    /// Items of `page` as `data`, plus `currPage`/`totalPages`.
    #[must_use]
    pub fn paginated(page: Page<T>) -> Self {
        Self {
            curr_page: Some(page.current_page),
            total_pages: Some(page.total_pages),
            ..Self::ok(page.items)
        }
    }
}

impl<T> From<ActionError> for Response<T> {
    fn from(err: ActionError) -> Self {
        Self::failure(err.code, err.message)
    }
}

impl<T> From<Result<T, ActionError>> for Response<T> {
    fn from(result: Result<T, ActionError>) -> Self {
        result.map_or_else(Self::from, Self::ok)
    }
}
