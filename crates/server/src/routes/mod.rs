//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                         - Product listing (same as /products/)
//! GET    /products/                - Product listing, HTML or JSON
//! GET    /products/bulk-insert/    - Bulk upsert form
//! POST   /products/bulk-insert/    - Bulk upsert/delete by name and sku
//! GET    /products/{id}/           - Product detail, HTML or JSON
//! PUT    /products/{id}/           - Edit product and variants by id
//! DELETE /products/{id}/           - Delete product and its variants
//! ```
//!
//! Any other method on these paths returns 405 with a JSON error body.

pub mod bulk;
pub mod products;

use axum::{
    Router,
    http::{HeaderMap, header},
    routing::get,
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the catalog router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).fallback(method_not_allowed))
        .route(
            "/products/",
            get(products::index).fallback(method_not_allowed),
        )
        .route(
            "/products/bulk-insert/",
            get(bulk::form)
                .post(bulk::insert)
                .fallback(method_not_allowed),
        )
        .route(
            "/products/{id}/",
            get(products::show)
                .put(products::update)
                .delete(products::destroy)
                .fallback(method_not_allowed),
        )
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Whether the client asked for JSON rather than a rendered page.
pub(crate) fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("application/json"))
}
