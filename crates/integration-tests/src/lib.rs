//! Integration tests for the catalog service.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p catalog-cli -- migrate
//! cargo run -p catalog-server
//!
//! # Run the ignored end-to-end tests
//! cargo test -p catalog-integration-tests -- --ignored
//! ```
//!
//! `CATALOG_BASE_URL` points the tests at another server
//! (default `http://localhost:8000`).

use reqwest::{Client, Response, header};
use serde_json::Value;
use uuid::Uuid;

/// Base URL for the catalog server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// HTTP client for the tests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A product name no other test run will use.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// POST a bulk payload.
///
/// # Errors
///
/// Returns the transport error if the request could not be sent.
pub async fn bulk_insert(client: &Client, body: &Value) -> reqwest::Result<Response> {
    client
        .post(format!("{}/products/bulk-insert/", base_url()))
        .json(body)
        .send()
        .await
}

/// Fetch the JSON product listing.
///
/// # Errors
///
/// Returns the transport or decode error.
pub async fn list_products(client: &Client) -> reqwest::Result<Vec<Value>> {
    client
        .get(format!("{}/products/", base_url()))
        .header(header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

/// Find the product with this name in the JSON listing.
///
/// # Errors
///
/// Returns the transport or decode error.
pub async fn find_product(client: &Client, name: &str) -> reqwest::Result<Option<Value>> {
    Ok(list_products(client)
        .await?
        .into_iter()
        .find(|product| product["name"] == name))
}
