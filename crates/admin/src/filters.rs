//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// CSS classes for a status badge.
///
/// Usage in templates: `<span class="{{ order.status|badge }}">`
#[askama::filter_fn]
pub fn badge(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(badge_class(&value.to_string()))
}

fn badge_class(status: &str) -> &'static str {
    match status {
        "delivered" | "paid" | "active" => "badge badge-success",
        "shipped" | "in_transit" => "badge badge-info",
        "pending" => "badge badge-warning",
        "cancelled" | "returned" | "inactive" | "expired" => "badge badge-danger",
        _ => "badge",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_badges() {
        assert_eq!(badge_class("in_transit"), "badge badge-info");
        assert_eq!(badge_class("cancelled"), "badge badge-danger");
        assert_eq!(badge_class("something-else"), "badge");
    }
}
