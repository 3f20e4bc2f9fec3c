//! Vitrine Storefront library.
//!
//! The public trilingual catalog site, built as a library so the router can
//! be exercised in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod messages;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, middleware::from_fn, middleware::from_fn_with_state, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::locale_middleware,
        ))
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        locale = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the document store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use rust_decimal::Decimal;
    use tower::ServiceExt;
    use vitrine_core::{ApplicationStatus, MultilingualText, NewCategory, NewProduct, Product};
    use vitrine_data::{
        ApplicationRepository, CategoryRepository, MemoryDocumentStore, ProductRepository,
    };

    use super::*;
    use crate::config::StorefrontConfig;

    fn text(ru: &str, en: &str) -> MultilingualText {
        MultilingualText::new(ru, format!("{en} uz"), en)
    }

    async fn seed_product(store: &MemoryDocumentStore, ru: &str, en: &str, category: &str) -> Product {
        ProductRepository::new(store)
            .create(&NewProduct {
                title: text(ru, en),
                description: text("Описание", "Description"),
                price: Decimal::new(1_500_000, 0),
                features: vec![text("Нержавеющая сталь", "Stainless steel")],
                category_id: category.to_string(),
                images: vec![],
            })
            .await
            .unwrap()
    }

    fn test_app(store: Arc<MemoryDocumentStore>) -> Router {
        let config = StorefrontConfig {
            catalog_page_size: 2,
            base_url: "https://vitrine.example.uz".to_string(),
            ..StorefrontConfig::local()
        };
        app(AppState::new(config, store))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn set_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    fn contact_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(Arc::new(MemoryDocumentStore::new()));
        let response = get(app.clone(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");

        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_param_sets_locale_cookie() {
        let store = Arc::new(MemoryDocumentStore::new());
        seed_product(&store, "Кормушка", "Feeder", "c1").await;
        let response = get(test_app(store), "/products?lang=en").await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("locale=en"));
        assert!(cookie.contains("SameSite=Lax"));

        let html = body_text(response).await;
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("Feeder"));
        assert!(html.contains("Product catalog"));
    }

    #[tokio::test]
    async fn test_matching_cookie_is_not_rewritten() {
        let app = test_app(Arc::new(MemoryDocumentStore::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/about")
                    .header(header::COOKIE, "locale=en")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
        assert!(body_text(response).await.contains("About us"));
    }

    #[tokio::test]
    async fn test_accept_language_then_default() {
        let app = test_app(Arc::new(MemoryDocumentStore::new()));
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(set_cookie(&response).unwrap().starts_with("locale=en"));

        let response = get(app, "/?lang=de").await;
        assert!(set_cookie(&response).unwrap().starts_with("locale=ru"));
        assert!(body_text(response).await.contains("<html lang=\"ru\">"));
    }

    #[tokio::test]
    async fn test_results_fragment_search_ignores_category() {
        let store = Arc::new(MemoryDocumentStore::new());
        seed_product(&store, "Насос", "Feed pump v2", "pumps").await;
        seed_product(&store, "Поилка", "Drinker", "drinkers").await;

        let response = get(
            test_app(store),
            "/products/results?lang=en&category=drinkers&q=PUMP",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.starts_with("<div id=\"catalog-results\""));
        assert!(html.contains("Feed pump v2"));
        assert!(!html.contains("Drinker"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn test_catalog_page_has_debounced_search() {
        let app = test_app(Arc::new(MemoryDocumentStore::new()));
        let html = body_text(get(app, "/products").await).await;
        assert!(html.contains("delay:500ms"));
        assert!(html.contains("hx-sync=\"this:replace\""));
    }

    #[tokio::test]
    async fn test_product_detail_and_missing_product() {
        let store = Arc::new(MemoryDocumentStore::new());
        let category = CategoryRepository::new(store.as_ref())
            .create(&NewCategory {
                title: text("Кормушки", "Feeders"),
            })
            .await
            .unwrap();
        let product = seed_product(&store, "Кормушка", "Feeder", category.id.as_str()).await;
        let app = test_app(store);

        let response = get(app.clone(), &format!("/products/{}?lang=en", product.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Feeders"));
        assert!(html.contains("Stainless steel"));
        assert!(html.contains("1 500 000.00"));

        let response = get(app, "/products/missing?lang=en").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_contact_submission_creates_new_application() {
        let store = Arc::new(MemoryDocumentStore::new());
        let app = test_app(store.clone());

        let response = app
            .oneshot(contact_post(
                "name=Ali&surname=Valiyev&phoneNumber=%2B998%2090%20123%2045%2067&email=ali%40example.uz&message=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/contact?sent=1"
        );

        let applications = ApplicationRepository::new(store.as_ref())
            .list(None)
            .await
            .unwrap();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].status, ApplicationStatus::New);
        assert_eq!(applications[0].name, "Ali");
        assert_eq!(applications[0].message, None);
    }

    #[tokio::test]
    async fn test_invalid_contact_keeps_input_and_writes_nothing() {
        let store = Arc::new(MemoryDocumentStore::new());
        let app = test_app(store.clone());

        let mut request = contact_post(
            "name=Ali&surname=Valiyev&phoneNumber=%2B998901234567&email=not-an-email",
        );
        request
            .headers_mut()
            .insert(header::COOKIE, "locale=en".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("Enter a valid email address."));
        assert!(html.contains("value=\"Valiyev\""));

        let applications = ApplicationRepository::new(store.as_ref())
            .list(None)
            .await
            .unwrap();
        assert!(applications.is_empty());
    }

    #[tokio::test]
    async fn test_api_products_pages() {
        let store = Arc::new(MemoryDocumentStore::new());
        for n in 0..5 {
            seed_product(&store, &format!("Товар {n}"), &format!("Item {n}"), "c1").await;
        }

        let response = get(test_app(store), "/api/products?page=3&lang=en").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["totalCount"], 5);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["items"][0]["title"], "Item 0");
    }

    #[tokio::test]
    async fn test_sitemap_lists_products_with_alternates() {
        let store = Arc::new(MemoryDocumentStore::new());
        let product = seed_product(&store, "Кормушка", "Feeder", "c1").await;

        let response = get(test_app(store), "/sitemap.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/xml")
        );
        let xml = body_text(response).await;
        let loc = format!("https://vitrine.example.uz/products/{}", product.id);
        assert!(xml.contains(&format!("<loc>{loc}</loc>")));
        assert!(xml.contains(&format!("hreflang=\"uz\" href=\"{loc}?lang=uz\"")));
        assert!(xml.contains("<loc>https://vitrine.example.uz/contact</loc>"));
    }

    #[tokio::test]
    async fn test_security_and_request_id_headers() {
        let app = test_app(Arc::new(MemoryDocumentStore::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/robots.txt")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(
            body_text(response)
                .await
                .contains("Sitemap: https://vitrine.example.uz/sitemap.xml")
        );
    }
}
