//! Lifecycle and role enums stored as lowercase `TEXT` columns.

use serde::{Deserialize, Serialize};

/// Error for a status or role string that names no known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in lifecycle order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

text_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Paid => "paid",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

impl OrderStatus {
    /// Delivered and cancelled orders no longer change.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Shipment progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Returned,
}

text_enum!(ShipmentStatus, "shipment status", {
    Pending => "pending",
    InTransit => "in_transit",
    Delivered => "delivered",
    Returned => "returned",
});

/// Back-office role carried in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Read-only access.
    Viewer,
    /// Day-to-day operations, no destructive actions.
    Staff,
    /// Everything, including deletes and user management.
    Admin,
}

text_enum!(UserRole, "user role", {
    Viewer => "viewer",
    Staff => "staff",
    Admin => "admin",
});

impl UserRole {
    /// Whether this role grants at least the permissions of `required`.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        *self >= required
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_for_every_variant() {
        for s in OrderStatus::ALL {
            assert_eq!(s.as_str().parse::<OrderStatus>().unwrap(), *s);
        }
        for s in ShipmentStatus::ALL {
            assert_eq!(s.to_string().parse::<ShipmentStatus>().unwrap(), *s);
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("In_Transit".parse::<ShipmentStatus>().unwrap(), ShipmentStatus::InTransit);
        assert_eq!(" ADMIN ".parse::<UserRole>().unwrap(), UserRole::Admin);
    }

    #[test]
    fn unknown_values_name_the_kind() {
        let err = "lost".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: lost");
    }

    #[test]
    fn role_hierarchy() {
        assert!(UserRole::Admin.satisfies(UserRole::Staff));
        assert!(UserRole::Staff.satisfies(UserRole::Staff));
        assert!(!UserRole::Viewer.satisfies(UserRole::Staff));
    }

    #[test]
    fn final_orders() {
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Shipped.is_final());
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&ShipmentStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
    }
}
