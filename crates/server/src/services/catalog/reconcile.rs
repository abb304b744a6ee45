//! Create/update/delete decisions for products and variants.
//!
//! Both entry points are generic over [`CatalogStore`] and perform no
//! commit themselves; callers own the transaction boundary.

use tracing::debug;

use catalog_core::ProductId;

use super::{
    CatalogError, CatalogStore, ProductCommand, ProductUpdate, ReconcileSummary, UpdateOutcome,
    VariantCommand, VariantEdit,
};
use crate::models::Product;

/// Apply bulk commands in order.
///
/// Products are matched by name and variants by `(product, sku)`. Deletes
/// of missing entities are skipped. Variants listed under a product
/// deletion marker are never looked at.
///
/// # Errors
///
/// Returns the first store error; earlier writes are left for the caller
/// to roll back.
pub async fn apply_bulk<S: CatalogStore>(
    store: &mut S,
    commands: Vec<ProductCommand>,
) -> Result<ReconcileSummary, CatalogError> {
    let mut summary = ReconcileSummary::default();

    for command in commands {
        match command {
            ProductCommand::Delete { name } => {
                if let Some(product) = store.find_product_by_name(&name).await? {
                    store.delete_product(product.id).await?;
                    summary.products_deleted += 1;
                } else {
                    debug!(name = %name, "product to delete not found, skipping");
                    summary.skipped += 1;
                }
            }
            ProductCommand::Upsert {
                name,
                image,
                variants,
            } => {
                let product_id = match store.find_product_by_name(&name).await? {
                    Some(existing) => {
                        store.update_product(existing.id, &existing.name, &image).await?;
                        summary.products_updated += 1;
                        existing.id
                    }
                    None => {
                        let created = store.create_product(&name, &image).await?;
                        summary.products_created += 1;
                        created.id
                    }
                };

                for variant in variants {
                    apply_variant_by_sku(store, product_id, variant, &mut summary).await?;
                }
            }
        }
    }

    Ok(summary)
}

async fn apply_variant_by_sku<S: CatalogStore>(
    store: &mut S,
    product_id: ProductId,
    command: VariantCommand,
    summary: &mut ReconcileSummary,
) -> Result<(), CatalogError> {
    match command {
        VariantCommand::Delete { sku } => {
            if let Some(variant) = store.find_variant_by_sku(product_id, &sku).await? {
                store.delete_variant(variant.id).await?;
                summary.variants_deleted += 1;
            } else {
                debug!(%product_id, sku = %sku, "variant to delete not found, skipping");
                summary.skipped += 1;
            }
        }
        VariantCommand::Upsert(fields) => {
            match store.find_variant_by_sku(product_id, &fields.sku).await? {
                Some(existing) => {
                    store.update_variant(existing.id, &fields).await?;
                    summary.variants_updated += 1;
                }
                None => {
                    store.create_variant(product_id, &fields).await?;
                    summary.variants_created += 1;
                }
            }
        }
    }

    Ok(())
}

/// Apply a detail-path update to an existing product.
///
/// Variant ids that do not belong to `product` are skipped like missing
/// ones.
///
/// # Errors
///
/// Returns the first store error; earlier writes are left for the caller
/// to roll back.
pub async fn apply_update<S: CatalogStore>(
    store: &mut S,
    product: Product,
    update: ProductUpdate,
) -> Result<UpdateOutcome, CatalogError> {
    let (name, image, edits) = match update {
        ProductUpdate::Delete => {
            store.delete_product(product.id).await?;
            return Ok(UpdateOutcome::Deleted);
        }
        ProductUpdate::Replace {
            name,
            image,
            variants,
        } => (name, image, variants),
    };

    store.update_product(product.id, &name, &image).await?;
    let mut summary = ReconcileSummary {
        products_updated: 1,
        ..ReconcileSummary::default()
    };

    for edit in edits {
        match edit {
            VariantEdit::Delete(id) => {
                if let Some(variant) = store.find_variant_by_id(product.id, id).await? {
                    store.delete_variant(variant.id).await?;
                    summary.variants_deleted += 1;
                } else {
                    debug!(variant_id = %id, "variant to delete not found, skipping");
                    summary.skipped += 1;
                }
            }
            VariantEdit::Update(id, fields) => {
                if let Some(variant) = store.find_variant_by_id(product.id, id).await? {
                    store.update_variant(variant.id, &fields).await?;
                    summary.variants_updated += 1;
                } else {
                    debug!(variant_id = %id, "variant to update not found, skipping");
                    summary.skipped += 1;
                }
            }
            VariantEdit::Create(fields) => {
                store.create_variant(product.id, &fields).await?;
                summary.variants_created += 1;
            }
        }
    }

    Ok(UpdateOutcome::Updated(summary))
}
