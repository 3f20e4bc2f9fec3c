//! Storefront end-to-end tests.
//!
//! Require a running storefront; see the crate docs.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use serde_json::Value;
use vitrine_integration_tests::TestContext;

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_health_endpoints() {
    let ctx = TestContext::from_env();

    for path in ["/health", "/health/ready"] {
        let response = ctx.client.get(ctx.storefront(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_lang_query_sets_locale_cookie() {
    let ctx = TestContext::from_env();

    let response = ctx
        .client
        .get(ctx.storefront("/?lang=uz"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("locale="))
        .expect("locale cookie");
    assert!(cookie.starts_with("locale=uz"));

    let html = response.text().await.unwrap();
    assert!(html.contains("lang=\"uz\""));
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_catalog_api_pages_past_the_end() {
    let ctx = TestContext::from_env();

    let response = ctx
        .client
        .get(ctx.storefront("/api/products?page=9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = response.json().await.unwrap();
    assert_eq!(page["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(page["page"], 9999);
    assert!(page["totalPages"].is_u64());
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::from_env();

    let response = ctx
        .client
        .get(ctx.storefront("/products/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_sitemap_and_robots() {
    let ctx = TestContext::from_env();

    let sitemap = ctx
        .client
        .get(ctx.storefront("/sitemap.xml"))
        .send()
        .await
        .unwrap();
    assert_eq!(sitemap.status(), StatusCode::OK);
    assert!(
        sitemap.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    assert!(sitemap.text().await.unwrap().contains("<urlset"));

    let robots = ctx
        .client
        .get(ctx.storefront("/robots.txt"))
        .send()
        .await
        .unwrap();
    assert!(robots.text().await.unwrap().contains("Sitemap:"));
}

#[tokio::test]
#[ignore = "requires a running storefront"]
async fn test_contact_form_rejects_invalid_then_accepts_valid() {
    let ctx = TestContext::from_env();

    let invalid = ctx
        .client
        .post(ctx.storefront("/contact"))
        .form(&[
            ("name", "Aziz"),
            ("surname", "Karimov"),
            ("phoneNumber", "call me"),
            ("email", "aziz@example.uz"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let valid = ctx
        .client
        .post(ctx.storefront("/contact"))
        .form(&[
            ("name", "Aziz"),
            ("surname", "Karimov"),
            ("phoneNumber", "+998 90 123-45-67"),
            ("email", "aziz@example.uz"),
            ("message", "Integration test inquiry"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(valid.status(), StatusCode::SEE_OTHER);
    assert_eq!(valid.headers()[LOCATION], "/contact?sent=1");
}
