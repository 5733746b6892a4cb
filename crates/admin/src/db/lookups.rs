//! The `(id, name, state)` lookup tables.
//!
//! Six tables share one shape; each gets a [`Listable`] type generated by
//! `lookup_table!` and a [`LookupKind`] variant for routing by URL segment.

use super::RepositoryError;
use super::guard::Dependent;
use super::listing::{ListSpec, Listable, NoScope};
use crate::models::Lookup;

macro_rules! lookup_table {
    (
        $ty:ident, $table:literal, $entity:literal, $slug:literal, $title:literal,
        [$($dep:expr),* $(,)?]
    ) => {
        pub struct $ty;

        impl Listable for $ty {
            const ENTITY: &'static str = $entity;
            const SLUG: &'static str = $slug;
            const TITLE: &'static str = $title;
            const TABLE: &'static str = $table;
            const SPEC: ListSpec = ListSpec {
                select: concat!("SELECT l.id, l.name, l.state FROM shop.", $table, " l"),
                count: concat!("SELECT COUNT(*) FROM shop.", $table, " l"),
                id_column: "l.id",
                text_columns: &["l.name"],
                active: Some("l.state"),
                order_by: "l.name",
            };
            const DEPENDENTS: Option<&'static [Dependent]> = Some(&[$($dep),*]);

            type Row = Lookup;
            type Item = Lookup;
            type Scope = NoScope;

            fn convert(row: Lookup) -> Result<Lookup, RepositoryError> {
                Ok(row)
            }
        }
    };
}

lookup_table!(Categories, "category", "category", "categories", "Categories", [
    Dependent::new("products", "product", "category_id"),
]);
lookup_table!(Colors, "color", "color", "colors", "Colors", [
    Dependent::new("product variants", "product_variant", "color_id"),
]);
lookup_table!(Sizes, "size", "size", "sizes", "Sizes", [
    Dependent::new("product variants", "product_variant", "size_id"),
]);
lookup_table!(VehicleTypes, "vehicle_type", "vehicle type", "vehicle-types", "Vehicle types", [
    Dependent::new("vehicles", "vehicle", "vehicle_type_id"),
]);
lookup_table!(
    VehicleStatuses,
    "vehicle_status",
    "vehicle status",
    "vehicle-statuses",
    "Vehicle statuses",
    [Dependent::new("vehicles", "vehicle", "vehicle_status_id")]
);
lookup_table!(
    VehicleDocumentTypes,
    "vehicle_document_type",
    "vehicle document type",
    "vehicle-document-types",
    "Vehicle document types",
    [Dependent::new("vehicle documents", "vehicle_document", "document_type_id")]
);

/// Runtime selector for the lookup tables, parsed from a URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Category,
    Color,
    Size,
    VehicleType,
    VehicleStatus,
    VehicleDocumentType,
}

impl LookupKind {
    pub const ALL: [Self; 6] = [
        Self::Category,
        Self::Color,
        Self::Size,
        Self::VehicleType,
        Self::VehicleStatus,
        Self::VehicleDocumentType,
    ];

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Category => Categories::SLUG,
            Self::Color => Colors::SLUG,
            Self::Size => Sizes::SLUG,
            Self::VehicleType => VehicleTypes::SLUG,
            Self::VehicleStatus => VehicleStatuses::SLUG,
            Self::VehicleDocumentType => VehicleDocumentTypes::SLUG,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Category => Categories::TITLE,
            Self::Color => Colors::TITLE,
            Self::Size => Sizes::TITLE,
            Self::VehicleType => VehicleTypes::TITLE,
            Self::VehicleStatus => VehicleStatuses::TITLE,
            Self::VehicleDocumentType => VehicleDocumentTypes::TITLE,
        }
    }
}
