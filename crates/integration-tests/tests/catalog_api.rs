//! End-to-end tests for the catalog HTTP API.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`catalog-cli migrate`)
//! - The catalog server running (`cargo run -p catalog-server`)
//!
//! Every test works on uniquely named products so runs do not interfere.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use catalog_integration_tests::{base_url, bulk_insert, client, find_product, unique_name};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};

fn shirt(name: &str, price: &str) -> Value {
    json!({
        "products": [{
            "name": name,
            "image": "img.png",
            "variants": [{"sku": "S1", "name": "Small", "price": price}]
        }]
    })
}

// ============================================================================
// Bulk Path
// ============================================================================

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_bulk_create_then_read_back() {
    let client = client();
    let name = unique_name("Shirt");

    let resp = bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Products and variants inserted/deleted successfully!"
    );

    let product = find_product(&client, &name).await.unwrap().unwrap();
    assert_eq!(product["image"], "img.png");
    let variants = product["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["sku"], "S1");
    assert_eq!(variants[0]["name"], "Small");
    assert_eq!(variants[0]["price"], "9.99");
    assert_eq!(variants[0]["details"], "");

    // Detail path returns the same projection
    let id = product["id"].as_i64().unwrap();
    let detail: Value = client
        .get(format!("{}/products/{id}/", base_url()))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail, product);
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_bulk_resubmission_is_idempotent() {
    let client = client();
    let name = unique_name("Shirt");

    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    let first = find_product(&client, &name).await.unwrap().unwrap();

    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    let second = find_product(&client, &name).await.unwrap().unwrap();
    assert_eq!(first, second);

    bulk_insert(&client, &shirt(&name, "12.99")).await.unwrap();
    let third = find_product(&client, &name).await.unwrap().unwrap();
    assert_eq!(third["id"], first["id"]);
    let variants = third["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["id"], first["variants"][0]["id"]);
    assert_eq!(variants[0]["price"], "12.99");
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_bulk_delete_cascades() {
    let client = client();
    let name = unique_name("Shirt");

    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    let product = find_product(&client, &name).await.unwrap().unwrap();

    let resp = bulk_insert(&client, &json!({"products": [{"name": name, "delete": true}]}))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(find_product(&client, &name).await.unwrap().is_none());

    let resp = client
        .get(format!("{}/products/{}/", base_url(), product["id"]))
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_bulk_delete_of_missing_product_is_skipped() {
    let client = client();
    let name = unique_name("Ghost");

    let resp = bulk_insert(&client, &json!({"products": [{"name": name, "delete": true}]}))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_bulk_malformed_entry_persists_nothing() {
    let client = client();
    let good = unique_name("Good");
    let bad = unique_name("Bad");

    let resp = bulk_insert(
        &client,
        &json!({"products": [
            {"name": good, "image": "a.png", "variants": []},
            {"name": bad, "variants": [{"sku": "X", "name": "No price"}]}
        ]}),
    )
    .await
    .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(find_product(&client, &good).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_bulk_price_is_rounded_to_cents() {
    let client = client();
    let name = unique_name("Shirt");

    let resp = bulk_insert(&client, &shirt(&name, "9.999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let product = find_product(&client, &name).await.unwrap().unwrap();
    assert_eq!(product["variants"][0]["price"], "10.00");
}

// ============================================================================
// Detail Path
// ============================================================================

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_put_edits_product_and_variants() {
    let client = client();
    let name = unique_name("Shirt");
    let renamed = unique_name("Tee");

    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    let product = find_product(&client, &name).await.unwrap().unwrap();
    let id = product["id"].as_i64().unwrap();
    let variant_id = product["variants"][0]["id"].as_i64().unwrap();

    let resp = client
        .put(format!("{}/products/{id}/", base_url()))
        .json(&json!({
            "name": renamed,
            "image": "new.png",
            "variants": [
                {"id": variant_id, "sku": "S1", "name": "Small", "price": "10.50", "details": "slim"},
                {"sku": "L1", "name": "Large", "price": "11.00"},
                {"id": 2_147_483_000, "delete": true}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product and variants updated successfully!");

    let product = find_product(&client, &renamed).await.unwrap().unwrap();
    assert_eq!(product["image"], "new.png");
    let variants = product["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0]["price"], "10.50");
    assert_eq!(variants[0]["details"], "slim");
    assert_eq!(variants[1]["sku"], "L1");
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_put_delete_flag_removes_product() {
    let client = client();
    let name = unique_name("Shirt");

    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    let product = find_product(&client, &name).await.unwrap().unwrap();

    let resp = client
        .put(format!("{}/products/{}/", base_url(), product["id"]))
        .json(&json!({"delete": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product deleted successfully!");
    assert!(find_product(&client, &name).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_put_missing_product_is_not_found() {
    let resp = client()
        .put(format!("{}/products/2147483000/", base_url()))
        .body("not even json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_delete_endpoint() {
    let client = client();
    let name = unique_name("Shirt");

    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();
    let product = find_product(&client, &name).await.unwrap().unwrap();
    let url = format!("{}/products/{}/", base_url(), product["id"]);

    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Pages and Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_listing_renders_html_by_default() {
    let client = client();
    let name = unique_name("Shirt");
    bulk_insert(&client, &shirt(&name, "9.99")).await.unwrap();

    let resp = client
        .get(format!("{}/products/", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(&name));
    assert!(body.contains("$9.99"));
}

#[tokio::test]
#[ignore = "Requires running catalog server and database"]
async fn test_readiness() {
    let resp = client()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
