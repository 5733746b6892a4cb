//! Product and variant repository.

use serde::Deserialize;
use sqlx::PgPool;

use tradepost_core::{LookupId, ProductId};

use super::RepositoryError;
use super::guard::Dependent;
use super::listing::{self, Filters, ListSpec, Listable, ScopeFilter, empty_as_none};
use crate::models::{Product, ProductDetail, ProductVariant};

/// Products of one category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<LookupId>,
}

impl ScopeFilter for ProductScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(id) = self.category_id {
            filters.and().push("p.category_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Products;

impl Listable for Products {
    const ENTITY: &'static str = "product";
    const SLUG: &'static str = "products";
    const TITLE: &'static str = "Products";
    const TABLE: &'static str = "product";
    const SPEC: ListSpec = ListSpec {
        select: "SELECT p.id, p.category_id, c.name AS category_name, p.name, p.description, \
                 p.base_price, p.state, p.created_at \
                 FROM shop.product p JOIN shop.category c ON c.id = p.category_id",
        count: "SELECT COUNT(*) FROM shop.product p JOIN shop.category c ON c.id = p.category_id",
        id_column: "p.id",
        text_columns: &["p.name", "p.description"],
        active: Some("p.state"),
        order_by: "p.name, p.id",
    };
    const DEPENDENTS: Option<&'static [Dependent]> = Some(&[Dependent::new(
        "product variants",
        "product_variant",
        "product_id",
    )]);

    type Row = Product;
    type Item = Product;
    type Scope = ProductScope;

    fn convert(row: Product) -> Result<Product, RepositoryError> {
        Ok(row)
    }
}

/// Variants of one product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantScope {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub product_id: Option<ProductId>,
}

impl ScopeFilter for VariantScope {
    fn apply(&self, filters: &mut Filters<'_, '_>) {
        if let Some(id) = self.product_id {
            filters.and().push("v.product_id = ").push_bind(id.as_i32());
        }
    }
}

pub struct Variants;

const VARIANT_SELECT: &str = "SELECT v.id, v.product_id, p.name AS product_name, \
     v.color_id, co.name AS color_name, v.size_id, s.name AS size_name, \
     v.sku, v.price, v.stock, v.state \
     FROM shop.product_variant v \
     JOIN shop.product p ON p.id = v.product_id \
     JOIN shop.color co ON co.id = v.color_id \
     JOIN shop.size s ON s.id = v.size_id";

impl Listable for Variants {
    const ENTITY: &'static str = "product variant";
    const SLUG: &'static str = "variants";
    const TITLE: &'static str = "Product variants";
    const TABLE: &'static str = "product_variant";
    const SPEC: ListSpec = ListSpec {
        select: VARIANT_SELECT,
        count: "SELECT COUNT(*) FROM shop.product_variant v \
                JOIN shop.product p ON p.id = v.product_id",
        id_column: "v.id",
        text_columns: &["v.sku", "p.name"],
        active: Some("v.state"),
        order_by: "p.name, v.sku",
    };
    const DEPENDENTS: Option<&'static [Dependent]> =
        Some(&[Dependent::new("order items", "order_item", "variant_id")]);

    type Row = ProductVariant;
    type Item = ProductVariant;
    type Scope = VariantScope;

    fn convert(row: ProductVariant) -> Result<ProductVariant, RepositoryError> {
        Ok(row)
    }
}

/// Repository for product detail views.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A product with every variant, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn detail(&self, id: ProductId) -> Result<ProductDetail, RepositoryError> {
        let product = listing::find::<Products>(self.pool, id.as_i32()).await?;
        let variants = self.variants_of(id, false).await?;
        Ok(ProductDetail { product, variants })
    }

    /// An active product with its active variants, for the public catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist or is inactive.
    pub async fn catalog_detail(&self, id: ProductId) -> Result<ProductDetail, RepositoryError> {
        let product = listing::find::<Products>(self.pool, id.as_i32()).await?;
        if !product.state {
            return Err(RepositoryError::NotFound);
        }
        let variants = self.variants_of(id, true).await?;
        Ok(ProductDetail { product, variants })
    }

    async fn variants_of(
        &self,
        id: ProductId,
        active_only: bool,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let mut sql = format!("{VARIANT_SELECT} WHERE v.product_id = $1");
        if active_only {
            sql.push_str(" AND v.state");
        }
        sql.push_str(" ORDER BY co.name, s.name");

        let variants = sqlx::query_as::<_, ProductVariant>(&sql)
            .bind(id.as_i32())
            .fetch_all(self.pool)
            .await?;
        Ok(variants)
    }
}
