//! Product and variant reconciliation.
//!
//! The bulk path applies a list of product descriptors, matched by product
//! name and variant sku, inside one transaction. The detail path edits one
//! product, matching its variants by id. Either every change commits or
//! none does.
//!
//! Request bodies are decoded into commands ([`payload`]) before any write
//! happens; [`reconcile`] then applies the commands to a [`CatalogStore`].

pub mod payload;
pub mod reconcile;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use catalog_core::{ProductId, VariantId};

use crate::db::{CatalogTransaction, RepositoryError};
use crate::models::{Product, ProductVariant, VariantFields};

pub use payload::{ProductCommand, ProductUpdate, VariantCommand, VariantEdit};

/// Response message for a successful bulk request.
pub const BULK_SUCCESS_MESSAGE: &str = "Products and variants inserted/deleted successfully!";

/// Response message for a successful product update.
pub const UPDATE_SUCCESS_MESSAGE: &str = "Product and variants updated successfully!";

/// Response message for a product deleted through the detail path.
pub const DELETE_SUCCESS_MESSAGE: &str = "Product deleted successfully!";

/// Errors raised while decoding or applying catalog changes.
///
/// The display string is what clients see, so it stays close to the
/// underlying error's own text.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The body is not valid JSON or does not match the payload shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A key required by the chosen operation is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// The product addressed by id does not exist.
    #[error("Product not found")]
    ProductNotFound,

    /// The store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Persistence operations the reconciler needs.
///
/// Every call happens inside one unit of work; the implementor decides how
/// that unit is committed or discarded. Lookups by natural key return the
/// oldest match when duplicates exist.
pub trait CatalogStore: Send {
    /// Look up a product by surrogate id.
    fn find_product_by_id(
        &mut self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Look up a product by its natural key, the name.
    fn find_product_by_name(
        &mut self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Insert a product.
    fn create_product(
        &mut self,
        name: &str,
        image: &str,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Overwrite a product's name and image.
    fn update_product(
        &mut self,
        id: ProductId,
        name: &str,
        image: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a product and all of its variants.
    fn delete_product(
        &mut self,
        id: ProductId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a variant by its natural key within a product.
    fn find_variant_by_sku(
        &mut self,
        product_id: ProductId,
        sku: &str,
    ) -> impl Future<Output = Result<Option<ProductVariant>, RepositoryError>> + Send;

    /// Look up a variant by surrogate id, scoped to its owning product.
    fn find_variant_by_id(
        &mut self,
        product_id: ProductId,
        id: VariantId,
    ) -> impl Future<Output = Result<Option<ProductVariant>, RepositoryError>> + Send;

    /// Insert a variant under a product.
    fn create_variant(
        &mut self,
        product_id: ProductId,
        fields: &VariantFields,
    ) -> impl Future<Output = Result<ProductVariant, RepositoryError>> + Send;

    /// Overwrite a variant's sku, name, price and details.
    fn update_variant(
        &mut self,
        id: VariantId,
        fields: &VariantFields,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a variant.
    fn delete_variant(
        &mut self,
        id: VariantId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Counts of what one reconciliation changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub products_created: usize,
    pub products_updated: usize,
    pub products_deleted: usize,
    pub variants_created: usize,
    pub variants_updated: usize,
    pub variants_deleted: usize,
    /// Deletes and id-addressed updates whose target did not exist.
    pub skipped: usize,
}

/// Result of a detail-path update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The `delete` flag was set and the product is gone.
    Deleted,
    /// The product and its variants were edited.
    Updated(ReconcileSummary),
}

impl UpdateOutcome {
    /// Message returned to the client.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Deleted => DELETE_SUCCESS_MESSAGE,
            Self::Updated(_) => UPDATE_SUCCESS_MESSAGE,
        }
    }
}

/// Apply bulk commands in one transaction.
///
/// # Errors
///
/// Returns `CatalogError::Repository` if any write fails; nothing is
/// committed in that case.
#[instrument(skip_all, fields(products = commands.len()))]
pub async fn bulk_upsert(
    pool: &PgPool,
    commands: Vec<ProductCommand>,
) -> Result<ReconcileSummary, CatalogError> {
    let mut tx = CatalogTransaction::begin(pool).await?;
    let summary = reconcile::apply_bulk(&mut tx, commands).await?;
    tx.commit().await?;

    tracing::info!(
        products_created = summary.products_created,
        products_updated = summary.products_updated,
        products_deleted = summary.products_deleted,
        variants_created = summary.variants_created,
        variants_updated = summary.variants_updated,
        variants_deleted = summary.variants_deleted,
        skipped = summary.skipped,
        "Bulk reconciliation committed"
    );

    Ok(summary)
}

/// Decode a detail-path body and apply it to one product in one transaction.
///
/// The product is looked up before the body is decoded, so a missing
/// product reports `ProductNotFound` even when the body is malformed.
///
/// # Errors
///
/// Returns `CatalogError::ProductNotFound` if no product has this id,
/// `CatalogError::Json`/`MissingField` for a bad body, and
/// `CatalogError::Repository` if a write fails.
#[instrument(skip(pool, body), fields(product_id = %id))]
pub async fn update_product(
    pool: &PgPool,
    id: ProductId,
    body: &[u8],
) -> Result<UpdateOutcome, CatalogError> {
    let mut tx = CatalogTransaction::begin(pool).await?;
    let product = tx
        .find_product_by_id(id)
        .await?
        .ok_or(CatalogError::ProductNotFound)?;

    let update = payload::parse_update(body)?;
    let outcome = reconcile::apply_update(&mut tx, product, update).await?;
    tx.commit().await?;

    tracing::info!(outcome = ?outcome, "Product update committed");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_raw_text() {
        assert_eq!(
            CatalogError::MissingField("image").to_string(),
            "missing field `image`"
        );
        assert_eq!(
            CatalogError::ProductNotFound.to_string(),
            "Product not found"
        );
        assert_eq!(
            CatalogError::Repository(RepositoryError::NotFound).to_string(),
            "not found"
        );
    }

    #[test]
    fn test_update_outcome_messages() {
        assert_eq!(UpdateOutcome::Deleted.message(), DELETE_SUCCESS_MESSAGE);
        assert_eq!(
            UpdateOutcome::Updated(ReconcileSummary::default()).message(),
            UPDATE_SUCCESS_MESSAGE
        );
    }
}
