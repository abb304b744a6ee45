//! Request bodies and the commands decoded from them.
//!
//! Bodies are deserialized leniently (optional keys stay `Option`), then
//! converted into commands. Which keys are required depends on whether an
//! entry is a deletion marker, so that check happens in the conversion and
//! reports the same `missing field` text serde uses.

use serde::Deserialize;

use catalog_core::{Price, VariantId};

use super::CatalogError;
use crate::models::VariantFields;

// =============================================================================
// Bulk Path
// =============================================================================

/// Body of `POST /products/bulk-insert/`.
#[derive(Debug, Deserialize)]
pub struct BulkPayload {
    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

/// One product descriptor in a bulk body.
#[derive(Debug, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub image: Option<String>,
    /// Missing or `null` means not deleted.
    pub delete: Option<bool>,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,
}

/// One variant descriptor in a bulk body, addressed by sku.
#[derive(Debug, Deserialize)]
pub struct VariantEntry {
    pub sku: String,
    pub name: Option<String>,
    pub price: Option<Price>,
    pub details: Option<String>,
    pub delete: Option<bool>,
}

/// A product-level bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductCommand {
    /// Delete the product with this name, if any.
    Delete { name: String },
    /// Create or update the product with this name, then its variants.
    Upsert {
        name: String,
        image: String,
        variants: Vec<VariantCommand>,
    },
}

/// A variant-level bulk operation, addressed by sku within its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantCommand {
    /// Delete the variant with this sku, if any.
    Delete { sku: String },
    /// Create or update the variant with this sku.
    Upsert(VariantFields),
}

impl TryFrom<ProductEntry> for ProductCommand {
    type Error = CatalogError;

    fn try_from(entry: ProductEntry) -> Result<Self, Self::Error> {
        if entry.delete.unwrap_or(false) {
            return Ok(Self::Delete { name: entry.name });
        }

        let image = entry.image.ok_or(CatalogError::MissingField("image"))?;
        let variants = entry
            .variants
            .into_iter()
            .map(VariantCommand::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self::Upsert {
            name: entry.name,
            image,
            variants,
        })
    }
}

impl TryFrom<VariantEntry> for VariantCommand {
    type Error = CatalogError;

    fn try_from(entry: VariantEntry) -> Result<Self, Self::Error> {
        if entry.delete.unwrap_or(false) {
            return Ok(Self::Delete { sku: entry.sku });
        }

        Ok(Self::Upsert(variant_fields(
            Some(entry.sku),
            entry.name,
            entry.price,
            entry.details,
        )?))
    }
}

/// Decode a bulk body into commands.
///
/// # Errors
///
/// Returns `CatalogError::Json` if the body is not a valid bulk payload and
/// `CatalogError::MissingField` if an upsert entry lacks a required key.
pub fn parse_bulk(body: &[u8]) -> Result<Vec<ProductCommand>, CatalogError> {
    let payload: BulkPayload = serde_json::from_slice(body)?;
    payload
        .products
        .into_iter()
        .map(ProductCommand::try_from)
        .collect()
}

// =============================================================================
// Detail Path
// =============================================================================

/// Body of `PUT /products/<id>/`.
#[derive(Debug, Deserialize)]
pub struct UpdatePayload {
    pub name: Option<String>,
    pub image: Option<String>,
    pub delete: Option<bool>,
    #[serde(default)]
    pub variants: Vec<VariantEditEntry>,
}

/// One variant entry in a detail-path body, addressed by id.
#[derive(Debug, Deserialize)]
pub struct VariantEditEntry {
    pub id: Option<i32>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub price: Option<Price>,
    pub details: Option<String>,
    pub delete: Option<bool>,
}

/// A detail-path operation on one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductUpdate {
    /// Delete the product; nothing else in the body applies.
    Delete,
    /// Overwrite name and image, then apply the variant edits.
    Replace {
        name: String,
        image: String,
        variants: Vec<VariantEdit>,
    },
}

/// A variant operation on the detail path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantEdit {
    /// Delete this variant if it belongs to the product.
    Delete(VariantId),
    /// Overwrite this variant if it belongs to the product.
    Update(VariantId, VariantFields),
    /// Create a new variant under the product.
    Create(VariantFields),
}

impl TryFrom<UpdatePayload> for ProductUpdate {
    type Error = CatalogError;

    fn try_from(payload: UpdatePayload) -> Result<Self, Self::Error> {
        if payload.delete.unwrap_or(false) {
            return Ok(Self::Delete);
        }

        let name = payload.name.ok_or(CatalogError::MissingField("name"))?;
        let image = payload.image.ok_or(CatalogError::MissingField("image"))?;
        let variants = payload
            .variants
            .into_iter()
            .map(VariantEdit::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self::Replace {
            name,
            image,
            variants,
        })
    }
}

impl TryFrom<VariantEditEntry> for VariantEdit {
    type Error = CatalogError;

    fn try_from(entry: VariantEditEntry) -> Result<Self, Self::Error> {
        if entry.delete.unwrap_or(false) {
            let id = entry.id.ok_or(CatalogError::MissingField("id"))?;
            return Ok(Self::Delete(VariantId::new(id)));
        }

        let fields = variant_fields(entry.sku, entry.name, entry.price, entry.details)?;

        // A zero id means "no id", as a blank form field would.
        Ok(match entry.id.filter(|id| *id != 0) {
            Some(id) => Self::Update(VariantId::new(id), fields),
            None => Self::Create(fields),
        })
    }
}

/// Decode a detail-path body into an update.
///
/// # Errors
///
/// Returns `CatalogError::Json` if the body is not a valid update payload
/// and `CatalogError::MissingField` if a required key is absent.
pub fn parse_update(body: &[u8]) -> Result<ProductUpdate, CatalogError> {
    let payload: UpdatePayload = serde_json::from_slice(body)?;
    ProductUpdate::try_from(payload)
}

/// Collect writable variant fields; `details` defaults to empty.
fn variant_fields(
    sku: Option<String>,
    name: Option<String>,
    price: Option<Price>,
    details: Option<String>,
) -> Result<VariantFields, CatalogError> {
    Ok(VariantFields {
        sku: sku.ok_or(CatalogError::MissingField("sku"))?,
        name: name.ok_or(CatalogError::MissingField("name"))?,
        price: price.ok_or(CatalogError::MissingField("price"))?,
        details: details.unwrap_or_default(),
    })
}
