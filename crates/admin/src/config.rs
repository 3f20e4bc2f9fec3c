//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `IDENTITY_API_KEY` - API key of the identity provider (sample values are rejected)
//!
//! ## Optional
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; without either, documents and sessions are kept in memory)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL (default: `http://localhost:3001`); `https`
//!   marks the session cookie `Secure`
//! - `IDENTITY_ENDPOINT` - Identity provider base URL
//!   (default: `https://identitytoolkit.googleapis.com`)
//! - `ADMIN_EMAILS` - Comma-separated allowlist; empty allows every verified account
//! - `STORAGE_ENDPOINT` - Object storage base URL; without it uploads are kept in memory
//! - `STORAGE_BUCKET` - Bucket name (default: catalog)
//! - `STORAGE_TOKEN` - Bearer token for the storage API
//! - `DEFAULT_LOCALE` - `ru`, `uz` or `en` (default: ru)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;
use vitrine_core::Locale;

const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_STORAGE_BUCKET: &str = "catalog";

/// Shortest API key the identity provider issues.
const MIN_API_KEY_LENGTH: usize = 20;
/// Fewest distinct characters a real key has; catches `aaaa...` and `1234...`.
const MIN_API_KEY_DISTINCT_CHARS: usize = 10;

/// Fragments that mark a value copied from a sample `.env` (case-insensitive).
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "your-", "your_", "changeme", "replace", "placeholder", "example", "xxx", "todo", "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Identity provider settings.
#[derive(Clone)]
pub struct IdentityConfig {
    pub endpoint: Url,
    pub api_key: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl IdentityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: parse_url(
                "IDENTITY_ENDPOINT",
                &get_env_or_default("IDENTITY_ENDPOINT", DEFAULT_IDENTITY_ENDPOINT),
            )?,
            api_key: get_api_key("IDENTITY_API_KEY")?,
        })
    }
}

/// Object storage settings. Absent when `STORAGE_ENDPOINT` is unset.
#[derive(Clone)]
pub struct StorageConfig {
    pub endpoint: Url,
    pub bucket: String,
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("bucket", &self.bucket)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorageConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(endpoint) = get_optional_env("STORAGE_ENDPOINT") else {
            return Ok(None);
        };

        Ok(Some(Self {
            endpoint: parse_url("STORAGE_ENDPOINT", &endpoint)?,
            bucket: get_env_or_default("STORAGE_BUCKET", DEFAULT_STORAGE_BUCKET),
            token: get_optional_env("STORAGE_TOKEN").map(SecretString::from),
        }))
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` connection URL (contains password). `None` selects the
    /// in-memory document and session stores.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, without trailing slash
    pub base_url: String,
    /// Identity provider
    pub identity: IdentityConfig,
    /// Lowercased emails allowed to sign in; empty allows any verified account
    pub admin_emails: Vec<String>,
    /// Object storage; `None` keeps uploads in memory
    pub storage: Option<StorageConfig>,
    /// Primary locale for text fallback on the dashboard
    pub default_locale: Locale,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `IDENTITY_API_KEY` is missing or weak, or a
    /// variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_url(
            "ADMIN_BASE_URL",
            &get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001"),
        )?;

        Ok(Self {
            database_url: get_database_url("ADMIN_DATABASE_URL"),
            host: parse_env("ADMIN_HOST", "127.0.0.1")?,
            port: parse_env("ADMIN_PORT", "3001")?,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            identity: IdentityConfig::from_env()?,
            admin_emails: parse_email_list(&get_env_or_default("ADMIN_EMAILS", "")),
            storage: StorageConfig::from_env()?,
            default_locale: parse_env("DEFAULT_LOCALE", Locale::default().code())?,
            json_logs: get_optional_env("LOG_FORMAT")
                .is_some_and(|f| f.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the session cookie must be `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Whether `email` may use the admin panel.
    #[must_use]
    pub fn is_allowed(&self, email: &str) -> bool {
        self.admin_emails.is_empty()
            || self
                .admin_emails
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(email.trim()))
    }

    /// Configuration for tests and local runs: in-memory stores, no allowlist.
    #[must_use]
    pub fn local(identity_endpoint: Url) -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            identity: IdentityConfig {
                endpoint: identity_endpoint,
                api_key: SecretString::from("local-identity-key"),
            },
            admin_emails: Vec::new(),
            storage: None,
            default_locale: Locale::default(),
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an http(s) URL.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

/// Split a comma-separated list of emails, lowercased, blanks dropped.
fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect()
}

/// Reject API keys that are clearly not real: sample values, short strings
/// and strings built from a handful of repeated characters.
fn check_api_key(key: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    let reject = |reason: String| Err(ConfigError::InsecureSecret(key.to_string(), reason));

    if let Some(fragment) = PLACEHOLDER_FRAGMENTS.iter().find(|f| lower.contains(*f)) {
        return reject(format!("looks like a sample value (contains '{fragment}')"));
    }
    if value.chars().count() < MIN_API_KEY_LENGTH {
        return reject(format!("shorter than {MIN_API_KEY_LENGTH} characters"));
    }
    let distinct = value.chars().collect::<BTreeSet<_>>().len();
    if distinct < MIN_API_KEY_DISTINCT_CHARS {
        return reject(format!(
            "only {distinct} distinct characters; copy the key from the provider console"
        ));
    }
    Ok(())
}

/// Load the identity API key and reject obvious non-keys.
fn get_api_key(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    check_api_key(key, &value)?;
    Ok(SecretString::from(value.trim().to_string()))
}
