//! Identity provider client.
//!
//! Admins sign in with email and password against an Identity-Toolkit-style
//! REST API. A successful sign-in yields an id token; the admin session is
//! only created after the token has been looked up and verified.
//!
//! # Endpoints
//!
//! - `POST {endpoint}/v1/accounts:signInWithPassword?key={api_key}`
//! - `POST {endpoint}/v1/accounts:lookup?key={api_key}`

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Network or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The id token is malformed, expired or revoked.
    #[error("invalid id token")]
    InvalidToken,

    /// The account exists but is disabled.
    #[error("account is disabled")]
    Disabled,

    /// Any other rejection from the provider.
    #[error("identity provider returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The provider answered with an unexpected body.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl IdentityError {
    /// True for errors caused by what the user typed or sent, as opposed to
    /// provider or network failures.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidToken | Self::Disabled
        )
    }
}

/// An identity confirmed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider user id.
    pub uid: String,
    pub email: String,
}

/// Authentication provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange email and password for an id token.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<String, IdentityError>;

    /// Verify an id token and return who it belongs to.
    async fn lookup(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

// =============================================================================
// HTTP client
// =============================================================================

/// Identity provider over HTTP.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    disabled: bool,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl HttpIdentityProvider {
    #[must_use]
    pub const fn new(client: reqwest::Client, endpoint: Url, api_key: SecretString) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    fn method_url(&self, method: &str) -> Result<Url, IdentityError> {
        let mut url = self
            .endpoint
            .join(&format!("v1/accounts:{method}"))
            .map_err(|e| IdentityError::UnexpectedResponse(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        Ok(url)
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, IdentityError>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.method_url(method)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<R>()
                .await
                .map_err(|e| IdentityError::UnexpectedResponse(e.to_string()));
        }

        let message = response
            .json::<ErrorEnvelope>()
            .await
            .map(|envelope| envelope.error.message)
            .unwrap_or_default();
        debug!(method, status = status.as_u16(), message = %message, "Identity provider rejected request");
        Err(classify(status, message))
    }
}

/// Map a provider error message to an [`IdentityError`].
///
/// Messages look like `INVALID_PASSWORD` or `TOO_MANY_ATTEMPTS_TRY_LATER : ...`.
fn classify(status: StatusCode, message: String) -> IdentityError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL"
        | "MISSING_PASSWORD" => IdentityError::InvalidCredentials,
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
            IdentityError::InvalidToken
        }
        "USER_DISABLED" => IdentityError::Disabled,
        _ => IdentityError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<String, IdentityError> {
        let response: SignInResponse = self
            .call(
                "signInWithPassword",
                &SignInRequest {
                    email,
                    password: password.expose_secret(),
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(response.id_token)
    }

    #[instrument(skip_all)]
    async fn lookup(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let response: LookupResponse = self.call("lookup", &LookupRequest { id_token }).await?;
        let user = response
            .users
            .into_iter()
            .next()
            .ok_or(IdentityError::InvalidToken)?;

        if user.disabled {
            return Err(IdentityError::Disabled);
        }
        let email = user
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| IdentityError::UnexpectedResponse("account has no email".to_string()))?;

        Ok(VerifiedIdentity {
            uid: user.local_id,
            email,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn provider(endpoint: &str) -> HttpIdentityProvider {
        HttpIdentityProvider::new(
            reqwest::Client::new(),
            Url::parse(endpoint).unwrap(),
            SecretString::from("AIzaSyD3k9Qm2xLp7vR4tW8nB1cF6hJ0gE5"),
        )
    }

    #[test]
    fn test_method_url_carries_key() {
        let url = provider("https://identitytoolkit.googleapis.com")
            .method_url("lookup")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:lookup?key=AIzaSyD3k9Qm2xLp7vR4tW8nB1cF6hJ0gE5"
        );
    }

    #[test]
    fn test_method_url_keeps_emulator_prefix() {
        let url = provider("http://127.0.0.1:9099/identitytoolkit.googleapis.com/")
            .method_url("signInWithPassword")
            .unwrap();
        assert!(url.as_str().starts_with(
            "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key="
        ));
    }

    #[test]
    fn test_classify_provider_messages() {
        let bad_request = StatusCode::BAD_REQUEST;
        assert!(matches!(
            classify(bad_request, "INVALID_LOGIN_CREDENTIALS".to_string()),
            IdentityError::InvalidCredentials
        ));
        assert!(matches!(
            classify(bad_request, "INVALID_ID_TOKEN".to_string()),
            IdentityError::InvalidToken
        ));
        assert!(matches!(
            classify(bad_request, "USER_DISABLED".to_string()),
            IdentityError::Disabled
        ));
        assert!(matches!(
            classify(
                bad_request,
                "TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled".to_string()
            ),
            IdentityError::Rejected { status: 400, .. }
        ));
    }

    #[test]
    fn test_client_errors() {
        assert!(IdentityError::InvalidCredentials.is_client_error());
        assert!(IdentityError::InvalidToken.is_client_error());
        assert!(!IdentityError::UnexpectedResponse(String::new()).is_client_error());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug_output = format!("{:?}", provider("https://identitytoolkit.googleapis.com"));
        assert!(!debug_output.contains("AIzaSy"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
