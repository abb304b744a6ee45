//! Domain models for the catalog.

pub mod product;

pub use product::{Product, ProductVariant, ProductWithVariants, VariantFields, VariantSummary};
