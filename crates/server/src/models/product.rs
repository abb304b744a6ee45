//! Products and their variants.

use serde::Serialize;

use catalog_core::{Price, ProductId, VariantId};

/// A catalog item. Owns zero or more [`ProductVariant`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    /// Natural key used by bulk upserts. Not unique in storage.
    pub name: String,
    pub image: String,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    /// Natural key within the owning product. Not unique in storage.
    pub sku: String,
    pub name: String,
    pub price: Price,
    pub details: Option<String>,
}

/// Writable variant fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFields {
    pub sku: String,
    pub name: String,
    pub price: Price,
    pub details: String,
}

/// Read projection of a product with its variants.
///
/// Serializes as `{id, name, image, variants: [{id, sku, name, price, details}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWithVariants {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub variants: Vec<VariantSummary>,
}

/// Variant as it appears inside [`ProductWithVariants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSummary {
    pub id: VariantId,
    pub sku: String,
    pub name: String,
    pub price: Price,
    pub details: Option<String>,
}

impl From<ProductVariant> for VariantSummary {
    fn from(variant: ProductVariant) -> Self {
        Self {
            id: variant.id,
            sku: variant.sku,
            name: variant.name,
            price: variant.price,
            details: variant.details,
        }
    }
}

impl ProductWithVariants {
    /// Assemble the projection from a product and its variants.
    #[must_use]
    pub fn new(product: Product, variants: Vec<ProductVariant>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            image: product.image,
            variants: variants.into_iter().map(VariantSummary::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_projection_json_shape() {
        let product = Product {
            id: ProductId::new(1),
            name: "Shirt".to_string(),
            image: "img.png".to_string(),
        };
        let variant = ProductVariant {
            id: VariantId::new(5),
            product_id: ProductId::new(1),
            sku: "S1".to_string(),
            name: "Small".to_string(),
            price: "9.99".parse().unwrap(),
            details: Some(String::new()),
        };

        let value = serde_json::to_value(ProductWithVariants::new(product, vec![variant])).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Shirt",
                "image": "img.png",
                "variants": [
                    {"id": 5, "sku": "S1", "name": "Small", "price": "9.99", "details": ""}
                ]
            })
        );
    }
}
