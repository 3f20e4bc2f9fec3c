//! Integration tests for Vitrine.
//!
//! These tests talk to running binaries over HTTP and are `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start both binaries (in-memory stores are fine)
//! cargo run -p vitrine-storefront &
//! cargo run -p vitrine-admin &
//!
//! # Run integration tests
//! cargo test -p vitrine-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - storefront base URL (default `http://localhost:3000`)
//! - `ADMIN_URL` - admin base URL (default `http://localhost:3001`)
//! - `ADMIN_TEST_ID_TOKEN` - id token of an allowed admin; admin API tests
//!   that need a session are skipped without it

use std::time::Duration;

use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::json;

/// Shared client and target URLs for one test.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub admin_url: String,
    pub admin_id_token: Option<String>,
}

impl TestContext {
    /// Build a context from the environment (after loading `.env`).
    ///
    /// The client keeps cookies and does not follow redirects, so tests can
    /// assert on `303`s and `Location` headers.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            storefront_url: env_url("STOREFRONT_URL", "http://localhost:3000"),
            admin_url: env_url("ADMIN_URL", "http://localhost:3001"),
            admin_id_token: std::env::var("ADMIN_TEST_ID_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn storefront(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Absolute admin URL for `path`.
    #[must_use]
    pub fn admin(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Exchange the configured id token for an admin session cookie.
    ///
    /// Returns `false` when no token is configured.
    ///
    /// # Panics
    ///
    /// Panics if the admin rejects the token.
    pub async fn sign_in_admin(&self) -> bool {
        let Some(token) = &self.admin_id_token else {
            return false;
        };
        let response = self
            .client
            .post(self.admin("/api/auth/session"))
            .json(&json!({ "idToken": token }))
            .send()
            .await
            .expect("Failed to reach admin");
        assert_eq!(response.status(), StatusCode::OK, "session exchange failed");
        true
    }
}

fn env_url(key: &str, default: &str) -> String {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Title text that is unique per test run.
#[must_use]
pub fn unique_title(prefix: &str) -> String {
    format!("{prefix} {}", uuid::Uuid::new_v4().simple())
}
