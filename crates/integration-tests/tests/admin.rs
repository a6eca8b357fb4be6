//! Integration tests for the admin panel.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database with a test admin user
//! - The admin server running (cargo run -p tezukuri-admin)
//! - `TEST_ADMIN_EMAIL` and `TEST_ADMIN_PASSWORD` in the environment

use reqwest::StatusCode;
use reqwest::multipart::Form;
use serde_json::{Value, json};

use tezukuri_integration_tests::{admin_base_url, admin_client, client, pool, unique_name};

async fn product_id_by_name(name: &str) -> Option<String> {
    sqlx::query_scalar::<_, String>("SELECT id FROM products WHERE name = $1")
        .bind(name)
        .fetch_optional(&pool().await)
        .await
        .expect("Failed to query products")
}

// ============================================================================
// Login gate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_pages_redirect_to_login() {
    let resp = client()
        .get(format!("{}/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_requires_session() {
    let resp = client()
        .post(format!("{}/api/rich-text/render", admin_base_url()))
        .json(&json!({"src": "/media/a.jpg"}))
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_wrong_password_is_rejected() {
    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", "nobody@tezukurivan.ca"), ("password", "wrong password")])
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_product_lifecycle() {
    let client = admin_client().await;
    let base_url = admin_base_url();
    let name = unique_name("Integration tote");

    let form = Form::new()
        .text("name", name.clone())
        .text("category", "Bags")
        .text("price", "45.00")
        .text("display_rank", "")
        .text("in_stock", "on")
        .text("tags", "canvas, test")
        .text("description", "Created by the integration tests");
    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let id = product_id_by_name(&name)
        .await
        .expect("created product is missing");

    let rank: Option<i32> = sqlx::query_scalar("SELECT display_rank FROM products WHERE id = $1")
        .bind(&id)
        .fetch_one(&pool().await)
        .await
        .expect("Failed to read rank");
    assert_eq!(rank, None, "a product created without a rank stays unranked");

    let body = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to list products")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains(&name));

    let resp = client
        .post(format!("{base_url}/products/{id}/delete"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(product_id_by_name(&name).await.is_none());
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_invalid_price_keeps_submitted_values() {
    let client = admin_client().await;
    let name = unique_name("Mispriced");

    let form = Form::new()
        .text("name", name.clone())
        .text("price", "forty");
    let resp = client
        .post(format!("{}/products", admin_base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid price"));
    assert!(body.contains(&name));
    assert!(product_id_by_name(&name).await.is_none());
}

// ============================================================================
// Order manager
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_order_manager_reset_discards_draft() {
    let client = admin_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/products/order/drag"))
        .form(&[("from", "0"), ("to", "0")])
        .send()
        .await
        .expect("Failed to drag");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .post(format!("{base_url}/products/order/reset"))
        .send()
        .await
        .expect("Failed to reset");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{base_url}/products/order"))
        .send()
        .await
        .expect("Failed to load order page")
        .text()
        .await
        .expect("Failed to read response");
    assert!(!body.contains("You have unsaved changes"));
}

// ============================================================================
// Sections and rich text
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_section_editor_adds_value_card_without_saving() {
    let client = admin_client().await;

    let form = Form::new()
        .text("title", "What we value")
        .text("content", "<p>Made slowly</p>")
        .text("action", "add_value");
    let resp = client
        .post(format!("{}/sections/about/values", admin_base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit section");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("name=\"value_title\""));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_section_key_must_belong_to_page() {
    let client = admin_client().await;
    let resp = client
        .post(format!("{}/sections/about/contact_cta", admin_base_url()))
        .multipart(Form::new().text("title", "Say hello"))
        .send()
        .await
        .expect("Failed to submit section");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_rich_text_render_and_parse() {
    let client = admin_client().await;
    let base_url = admin_base_url();

    let rendered: Value = client
        .post(format!("{base_url}/api/rich-text/render"))
        .json(&json!({
            "src": "/media/sections/van.jpg",
            "width": 420,
            "layout": "double",
            "position": "right",
            "side_text": "Our workshop on wheels"
        }))
        .send()
        .await
        .expect("Failed to render")
        .json()
        .await
        .expect("Failed to parse response");
    let html = rendered["html"].as_str().expect("html missing");

    let parsed: Value = client
        .post(format!("{base_url}/api/rich-text/parse"))
        .json(&json!({"markup": html}))
        .send()
        .await
        .expect("Failed to parse")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(parsed["src"], "/media/sections/van.jpg");
    assert_eq!(parsed["width"], 420);
    assert_eq!(parsed["layout"], "double");
    assert_eq!(parsed["position"], "right");
}
