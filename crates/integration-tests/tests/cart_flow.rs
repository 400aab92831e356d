//! End-to-end cart tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p driftwood-server)
//! - `DRIFTWOOD_ADMIN_TOKEN` set to the server's admin token
//!
//! Run with: cargo test -p driftwood-integration-tests -- --ignored

use driftwood_integration_tests::{add_to_cart, base_url, create_test_product, session_client};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_anonymous_cart_is_created_lazily() {
    let client = session_client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("invalid cart JSON");
    assert_eq!(body["status"], "success");
    assert!(body["data"]["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_adding_same_variant_twice_sums_quantities() {
    let client = session_client();
    let (_, variant_id) = create_test_product(&client, "10.00", 100).await;

    let resp = add_to_cart(&client, variant_id, 2).await;
    assert_eq!(resp.status(), 201);

    let resp = add_to_cart(&client, variant_id, 3).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("invalid cart JSON");

    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1, "expected one merged line, not two");
    assert_eq!(items[0]["quantity"], 5);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_update_to_zero_removes_item() {
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "10.00", 100).await;

    let resp = add_to_cart(&client, variant_id, 2).await;
    let body: Value = resp.json().await.expect("invalid cart JSON");
    let item_id = body["data"]["items"][0]["id"].as_i64().expect("item id");

    let resp = client
        .put(format!("{base}/cart/items/{item_id}"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update item");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("invalid cart JSON");
    assert!(body["data"]["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_negative_quantity_also_removes_item() {
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "10.00", 100).await;

    let resp = add_to_cart(&client, variant_id, 2).await;
    let body: Value = resp.json().await.expect("invalid cart JSON");
    let item_id = body["data"]["items"][0]["id"].as_i64().expect("item id");

    let resp = client
        .put(format!("{base}/cart/items/{item_id}"))
        .json(&json!({ "quantity": -1 }))
        .send()
        .await
        .expect("Failed to update item");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("invalid cart JSON");
    assert!(body["data"]["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_cart_can_exceed_stock_until_checkout() {
    // Deferred-validation policy: the cart accepts any quantity; stock is
    // enforced at checkout time.
    let client = session_client();
    let (_, variant_id) = create_test_product(&client, "10.00", 1).await;

    let resp = add_to_cart(&client, variant_id, 50).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("invalid cart JSON");
    assert_eq!(body["data"]["items"][0]["quantity"], 50);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_clear_cart() {
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "10.00", 100).await;

    add_to_cart(&client, variant_id, 2).await;

    let resp = client
        .delete(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    let body: Value = resp.json().await.expect("invalid cart JSON");
    assert!(body["data"]["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_removing_unknown_item_is_not_found() {
    let client = session_client();
    let base = base_url();

    // Touch the cart so the session has an identity.
    let _ = client.get(format!("{base}/cart")).send().await;

    let resp = client
        .delete(format!("{base}/cart/items/999999999"))
        .send()
        .await
        .expect("Failed to send delete");

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.expect("invalid JSON");
    assert_eq!(body["status"], "fail");
}
