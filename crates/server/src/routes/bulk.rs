//! Bulk upsert form and endpoint.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::services::catalog::{self, BULK_SUCCESS_MESSAGE, payload};
use crate::state::AppState;

/// Example body prefilled in the form.
const SAMPLE_PAYLOAD: &str = r#"{
  "products": [
    {
      "name": "Shirt",
      "image": "shirt.png",
      "variants": [
        {"sku": "S1", "name": "Small", "price": "9.99", "details": ""}
      ]
    }
  ]
}"#;

/// Bulk upsert form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/bulk_insert.html")]
pub struct BulkInsertTemplate {
    pub sample: &'static str,
}

/// Render the bulk upsert form.
#[instrument]
pub async fn form() -> impl IntoResponse {
    BulkInsertTemplate {
        sample: SAMPLE_PAYLOAD,
    }
}

/// Apply a bulk payload in one transaction.
///
/// # Errors
///
/// Returns 400 with the error text if the body cannot be decoded or any
/// write fails; nothing is persisted in that case.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn insert(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let commands = payload::parse_bulk(&body)?;
    catalog::bulk_upsert(state.pool(), commands).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": BULK_SUCCESS_MESSAGE })),
    ))
}
