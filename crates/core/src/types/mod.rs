//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for catalog domain concepts.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{Price, PriceError};
