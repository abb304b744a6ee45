//! Catalog server library.
//!
//! Products and variants stored in `PostgreSQL`, served over axum. The
//! binary in `main.rs` and the `catalog-cli` tool both build on this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
