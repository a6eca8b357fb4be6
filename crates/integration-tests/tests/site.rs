//! Integration tests for the public site.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The site server running (cargo run -p tezukuri-site)

use reqwest::StatusCode;
use serde_json::{Value, json};

use tezukuri_integration_tests::{client, site_base_url};

#[tokio::test]
#[ignore = "Requires running site server"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = site_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach site");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach site");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running site server"]
async fn test_public_pages_render() {
    let client = client();
    let base_url = site_base_url();

    for path in ["/", "/products", "/events", "/about", "/contact"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to reach site");
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        let body = resp.text().await.expect("Failed to read response");
        assert!(body.contains("Tezukuri Van"), "GET {path} is missing the layout");
    }
}

#[tokio::test]
#[ignore = "Requires running site server"]
async fn test_unknown_product_is_not_found() {
    let resp = client()
        .get(format!("{}/products/does-not-exist", site_base_url()))
        .send()
        .await
        .expect("Failed to reach site");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running site server"]
async fn test_contact_rejects_missing_fields() {
    let resp = client()
        .post(format!("{}/api/contact", site_base_url()))
        .json(&json!({"name": "", "email": "visitor@example.ca", "message": "Hello"}))
        .send()
        .await
        .expect("Failed to reach site");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
#[ignore = "Requires running site server"]
async fn test_contact_rejects_bad_email() {
    let resp = client()
        .post(format!("{}/api/contact", site_base_url()))
        .json(&json!({"name": "Visitor", "email": "not-an-email", "message": "Hello"}))
        .send()
        .await
        .expect("Failed to reach site");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
