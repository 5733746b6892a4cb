//! Catalog types: lookup values, products and their variants.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tradepost_core::{LookupId, Money, ProductId, VariantId};

/// A row of one of the `(id, name, state)` lookup tables
/// (category, color, size, vehicle type, vehicle status, document type).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Lookup {
    pub id: LookupId,
    pub name: String,
    pub state: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: LookupId,
    pub category_name: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Money,
    pub state: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub color_id: LookupId,
    pub color_name: String,
    pub size_id: LookupId,
    pub size_name: String,
    pub sku: String,
    pub price: Money,
    pub stock: i32,
    pub state: bool,
}

impl ProductVariant {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product with all of its variants.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}

impl ProductDetail {
    /// Total units across active variants.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.variants
            .iter()
            .filter(|v| v.state)
            .map(|v| i64::from(v.stock))
            .sum()
    }
}
