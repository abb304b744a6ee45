//! Database operations for products and variants.
//!
//! Reads go through [`ProductRepository`] on the pool. Writes made by the
//! reconciler go through [`CatalogTransaction`], which holds one open
//! transaction and implements [`CatalogStore`].

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use catalog_core::{Price, ProductId, VariantId};

use super::RepositoryError;
use crate::models::{Product, ProductVariant, ProductWithVariants, VariantFields};
use crate::services::catalog::CatalogStore;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    image: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            image: row.image,
        }
    }
}

/// Internal row type for variant queries.
#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: i32,
    product_id: i32,
    sku: String,
    name: String,
    price: Price,
    details: Option<String>,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
            product_id: ProductId::new(row.product_id),
            sku: row.sku,
            name: row.name,
            price: row.price,
            details: row.details,
        }
    }
}

// =============================================================================
// Read Repository
// =============================================================================

/// Repository for product reads and single-product deletes.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products with their variants, both ordered by id.
    ///
    /// Variants are fetched in one query and grouped in memory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_with_variants(&self) -> Result<Vec<ProductWithVariants>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, image
            FROM catalog.product
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let variants = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, sku, name, price, details
            FROM catalog.product_variant
            ORDER BY product_id, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<i32, Vec<ProductVariant>> = HashMap::new();
        for row in variants {
            by_product.entry(row.product_id).or_default().push(row.into());
        }

        Ok(products
            .into_iter()
            .map(|row| {
                let variants = by_product.remove(&row.id).unwrap_or_default();
                ProductWithVariants::new(row.into(), variants)
            })
            .collect())
    }

    /// Get one product with its variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_variants(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithVariants>, RepositoryError> {
        let Some(product) = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, image
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let variants = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, sku, name, price, details
            FROM catalog.product_variant
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(ProductWithVariants::new(
            product.into(),
            variants.into_iter().map(Into::into).collect(),
        )))
    }

    /// Delete a product; its variants go with it.
    ///
    /// Returns `false` if no product had that id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Transactional Store
// =============================================================================

/// One open catalog transaction.
///
/// Dropping it without calling [`CatalogTransaction::commit`] rolls back
/// every write made through it.
pub struct CatalogTransaction {
    tx: Transaction<'static, Postgres>,
}

impl CatalogTransaction {
    /// Open a transaction on the pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if no connection can be acquired.
    pub async fn begin(pool: &PgPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// Commit every write made through this transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the commit fails.
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl CatalogStore for CatalogTransaction {
    async fn find_product_by_id(
        &mut self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, image
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_product_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        // Names are not unique; the oldest row wins.
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, image
            FROM catalog.product
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_product(
        &mut self,
        name: &str,
        image: &str,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO catalog.product (name, image)
            VALUES ($1, $2)
            RETURNING id, name, image
            ",
        )
        .bind(name)
        .bind(image)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into())
    }

    async fn update_product(
        &mut self,
        id: ProductId,
        name: &str,
        image: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE catalog.product
            SET name = $2, image = $3
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(name)
        .bind(image)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_product(&mut self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM catalog.product WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn find_variant_by_sku(
        &mut self,
        product_id: ProductId,
        sku: &str,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        // (product, sku) is not unique; the oldest row wins.
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, sku, name, price, details
            FROM catalog.product_variant
            WHERE product_id = $1 AND sku = $2
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(product_id)
        .bind(sku)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_variant_by_id(
        &mut self,
        product_id: ProductId,
        id: VariantId,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, sku, name, price, details
            FROM catalog.product_variant
            WHERE id = $1 AND product_id = $2
            ",
        )
        .bind(id)
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_variant(
        &mut self,
        product_id: ProductId,
        fields: &VariantFields,
    ) -> Result<ProductVariant, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            INSERT INTO catalog.product_variant (product_id, sku, name, price, details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, sku, name, price, details
            ",
        )
        .bind(product_id)
        .bind(&fields.sku)
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.details)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into())
    }

    async fn update_variant(
        &mut self,
        id: VariantId,
        fields: &VariantFields,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE catalog.product_variant
            SET sku = $2, name = $3, price = $4, details = $5
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&fields.sku)
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.details)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_variant(&mut self, id: VariantId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM catalog.product_variant WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }
}
