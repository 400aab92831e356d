//! End-to-end checkout and order placement tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p driftwood-server)
//! - `DRIFTWOOD_ADMIN_TOKEN` set to the server's admin token
//!
//! Run with: cargo test -p driftwood-integration-tests -- --ignored

use driftwood_integration_tests::{
    add_to_cart, base_url, create_test_product, get_product, session_client, shipping_address,
};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_checkout_on_empty_cart_fails() {
    let client = session_client();
    let base = base_url();

    // Touch the cart so the session has an identity.
    let _ = client.get(format!("{base}/cart")).send().await;

    for path in ["/checkout/session", "/checkout/calculate"] {
        let resp = client
            .post(format!("{base}{path}"))
            .send()
            .await
            .expect("Failed to post checkout");
        assert_eq!(resp.status(), 400, "{path} should reject an empty cart");
        let body: Value = resp.json().await.expect("invalid JSON");
        assert_eq!(body["status"], "fail");
        assert!(
            body["message"]
                .as_str()
                .expect("message")
                .contains("empty"),
        );
    }

    let resp = client
        .post(format!("{base}/checkout/place-order"))
        .json(&json!({
            "shipping_address": shipping_address(),
            "email": "guest@example.com",
            "guest_name": "Guest",
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_calculate_totals_worked_example() {
    // 2 x $50.00 + $30.00 flat shipping = $130.00
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "50.00", 3).await;

    add_to_cart(&client, variant_id, 2).await;

    let resp = client
        .post(format!("{base}/checkout/calculate"))
        .send()
        .await
        .expect("Failed to calculate");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("invalid totals JSON");

    assert_eq!(body["data"]["subtotal"], "100.00");
    assert_eq!(body["data"]["shipping"], "30.00");
    assert_eq!(body["data"]["total"], "130.00");
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_validate_rejects_missing_address_fields() {
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "50.00", 3).await;
    add_to_cart(&client, variant_id, 1).await;

    let resp = client
        .post(format!("{base}/checkout/validate"))
        .json(&json!({ "shipping_address": { "street": "", "city": "Port Haven" } }))
        .send()
        .await
        .expect("Failed to validate");
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/checkout/validate"))
        .json(&json!({ "shipping_address": { "street": "1 Harbor Way", "city": "" } }))
        .send()
        .await
        .expect("Failed to validate");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_validate_names_out_of_stock_sku() {
    let client = session_client();
    let base = base_url();
    let (slug, variant_id) = create_test_product(&client, "50.00", 1).await;
    add_to_cart(&client, variant_id, 5).await;

    let resp = client
        .post(format!("{base}/checkout/validate"))
        .json(&json!({ "shipping_address": shipping_address() }))
        .send()
        .await
        .expect("Failed to validate");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("invalid JSON");
    let product = get_product(&client, &slug).await;
    let sku = product["data"]["variants"][0]["sku"]
        .as_str()
        .expect("sku");
    assert!(
        body["message"].as_str().expect("message").contains(sku),
        "stock failure should name the offending SKU"
    );
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_guest_order_happy_path_is_atomic() {
    let client = session_client();
    let base = base_url();
    let (slug, variant_id) = create_test_product(&client, "50.00", 3).await;

    add_to_cart(&client, variant_id, 2).await;

    let resp = client
        .post(format!("{base}/checkout/place-order"))
        .json(&json!({
            "shipping_address": shipping_address(),
            "payment_method": "card",
            "email": "guest@example.com",
            "phone_number": "555-0100",
            "guest_name": "Guest Shopper",
        }))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("invalid order JSON");
    let order = &body["data"];

    // Guest fields populated, no user.
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], "130.00");
    assert!(order["user_id"].is_null());
    assert_eq!(order["guest_email"], "guest@example.com");
    assert_eq!(order["guest_name"], "Guest Shopper");
    assert_eq!(order["guest_phone"], "555-0100");

    // Stock decremented by exactly the ordered quantity.
    let product = get_product(&client, &slug).await;
    assert_eq!(product["data"]["variants"][0]["stock"], 1);

    // Cart cleared.
    let resp = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    let cart: Value = resp.json().await.expect("invalid cart JSON");
    assert!(cart["data"]["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_order_without_payment_method_succeeds() {
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "20.00", 5).await;
    add_to_cart(&client, variant_id, 1).await;

    let resp = client
        .post(format!("{base}/checkout/place-order"))
        .json(&json!({
            "shipping_address": shipping_address(),
            "email": "guest@example.com",
            "guest_name": "Guest",
        }))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), 201);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_guest_order_requires_contact_details() {
    let client = session_client();
    let base = base_url();
    let (_, variant_id) = create_test_product(&client, "20.00", 5).await;
    add_to_cart(&client, variant_id, 1).await;

    let resp = client
        .post(format!("{base}/checkout/place-order"))
        .json(&json!({ "shipping_address": shipping_address() }))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("invalid JSON");
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_stale_validation_cannot_oversell() {
    // Stock passes pre-flight for both sessions, but only one order can win
    // the conditional decrement of the last units.
    let client_a = session_client();
    let client_b = session_client();
    let (slug, variant_id) = create_test_product(&client_a, "50.00", 2).await;

    add_to_cart(&client_a, variant_id, 2).await;
    add_to_cart(&client_b, variant_id, 2).await;

    let base = base_url();
    let order_body = json!({
        "shipping_address": shipping_address(),
        "email": "guest@example.com",
        "guest_name": "Guest",
    });

    let (resp_a, resp_b) = tokio::join!(
        client_a
            .post(format!("{base}/checkout/place-order"))
            .json(&order_body)
            .send(),
        client_b
            .post(format!("{base}/checkout/place-order"))
            .json(&order_body)
            .send(),
    );

    let status_a = resp_a.expect("request a failed").status();
    let status_b = resp_b.expect("request b failed").status();

    let successes = [status_a, status_b]
        .iter()
        .filter(|s| s.as_u16() == 201)
        .count();
    assert_eq!(successes, 1, "exactly one order should win the last units");

    // Stock never goes negative.
    let product = get_product(&client_a, &slug).await;
    assert_eq!(product["data"]["variants"][0]["stock"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_authenticated_order_links_user_and_omits_guest_fields() {
    let client = session_client();
    let base = base_url();
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("shopper-{tag}@example.com");

    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&json!({ "email": email, "password": "correct horse battery" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), 201);

    let (_, variant_id) = create_test_product(&client, "50.00", 3).await;
    add_to_cart(&client, variant_id, 1).await;

    let resp = client
        .post(format!("{base}/checkout/place-order"))
        .json(&json!({
            "shipping_address": shipping_address(),
            "payment_method": "card",
        }))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("invalid order JSON");
    let order = &body["data"];

    assert!(order["user_id"].is_number());
    assert!(order["guest_email"].is_null());
    assert!(order["guest_name"].is_null());
    assert!(order["guest_phone"].is_null());

    // The order shows up in the user's history.
    let order_id = order["id"].as_i64().expect("order id");
    let resp = client
        .get(format!("{base}/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("invalid orders JSON");
    let listed = body["data"].as_array().expect("orders");
    assert!(listed.iter().any(|o| o["id"].as_i64() == Some(order_id)));
}

#[tokio::test]
#[ignore = "Requires running server and PostgreSQL"]
async fn test_anonymous_cart_merges_into_account_on_login() {
    let client = session_client();
    let base = base_url();
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("merger-{tag}@example.com");

    // Register (and end up logged in), then log out to shop anonymously.
    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&json!({ "email": email, "password": "correct horse battery" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), 201);
    client
        .post(format!("{base}/auth/logout"))
        .send()
        .await
        .expect("Failed to logout");

    let (_, variant_id) = create_test_product(&client, "10.00", 10).await;
    add_to_cart(&client, variant_id, 4).await;

    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "email": email, "password": "correct horse battery" }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    let body: Value = resp.json().await.expect("invalid cart JSON");
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1, "anonymous cart should follow the login");
    assert_eq!(items[0]["quantity"], 4);
}
