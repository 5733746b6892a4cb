//! Typed row identifiers.
//!
//! Every table in the `shop` schema uses an `INTEGER` serial primary key. Wrapping
//! them in distinct newtypes keeps a `VehicleId` from being passed where an
//! `OrderId` is expected.

/// Define an `i32`-backed identifier newtype.
///
/// The generated type is `Copy`, serializes transparently as a number, parses
/// from a string (so it works as an axum `Path` segment), and implements the
/// sqlx `Type`/`Encode`/`Decode` traits when the `postgres` feature is enabled.
///
/// ```rust
/// # use tradepost_core::define_id;
/// define_id!(WidgetId);
///
/// let id: WidgetId = "42".parse().unwrap();
/// assert_eq!(id.as_i32(), 42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database id.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database id.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Geography
define_id!(CountryId);
define_id!(ProvinceId);
define_id!(CityId);
define_id!(AddressId);

// People
define_id!(PersonId);
define_id!(UserId);
define_id!(CustomerId);
define_id!(EmployeeId);

// Catalog
define_id!(LookupId);
define_id!(ProductId);
define_id!(VariantId);

// Sales and logistics
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(ShipmentId);

// Fleet
define_id!(VehicleId);
define_id!(VehicleDocumentId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_segments() {
        assert_eq!("17".parse::<OrderId>().unwrap(), OrderId::new(17));
        assert_eq!(" 3 ".parse::<VehicleId>().unwrap().as_i32(), 3);
        assert!("abc".parse::<ProductId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&CustomerId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: CustomerId = serde_json::from_str("9").unwrap();
        assert_eq!(back, CustomerId::new(9));
    }
}
