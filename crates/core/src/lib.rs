//! Catalog Core - Shared types library.
//!
//! This crate provides common types used across all catalog components:
//! - `server` - HTTP service for products and their variants
//! - `cli` - Command-line tools for migrations and bulk imports
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
