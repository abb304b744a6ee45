//! Product listing, detail, edit and delete handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use catalog_core::ProductId;

use super::wants_json;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::ProductWithVariants;
use crate::services::catalog::{self, DELETE_SUCCESS_MESSAGE};
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub products: Vec<ProductWithVariants>,
}

/// Product detail and edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/detail.html")]
pub struct ProductDetailTemplate {
    pub product: ProductWithVariants,
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

/// Path ids that are not integers name no product.
fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse::<i32>()
        .map(ProductId::new)
        .map_err(|_| product_not_found())
}

/// List every product with its variants.
#[instrument(skip(state, headers))]
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let products = ProductRepository::new(state.pool())
        .list_with_variants()
        .await?;

    if wants_json(&headers) {
        return Ok(Json(products).into_response());
    }
    Ok(ProductIndexTemplate { products }.into_response())
}

/// Show one product with its variants.
///
/// # Errors
///
/// Returns 404 if the id is not an integer or no product has it.
#[instrument(skip(state, headers))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let product = ProductRepository::new(state.pool())
        .get_with_variants(id)
        .await?
        .ok_or_else(product_not_found)?;

    if wants_json(&headers) {
        return Ok(Json(product).into_response());
    }
    Ok(ProductDetailTemplate { product }.into_response())
}

/// Edit a product and its variants, or delete it when the body says so.
///
/// # Errors
///
/// Returns 404 for an unknown product and 400 for a body that cannot be
/// applied.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_product_id(&id)?;
    let outcome = catalog::update_product(state.pool(), id, &body).await?;

    Ok(Json(json!({ "message": outcome.message() })))
}

/// Delete a product; its variants go with it.
///
/// # Errors
///
/// Returns 404 if no product has this id.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_product_id(&id)?;

    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(product_not_found());
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok((
        StatusCode::NO_CONTENT,
        Json(json!({ "message": DELETE_SUCCESS_MESSAGE })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("12").ok(), Some(ProductId::new(12)));
        assert!(matches!(
            parse_product_id("abc"),
            Err(AppError::NotFound(msg)) if msg == "Product not found"
        ));
        assert!(parse_product_id("1.5").is_err());
    }
}
