//! REST client for the hosted identity provider
//!
//! Implements [`CredentialService`] over the provider's identity-toolkit
//! style HTTP API: `accounts:signInWithPassword`, `accounts:signUp`,
//! `accounts:update`, `accounts:revokeToken`, and `accounts:sendOobCode`.
//! The API key travels in the query string; failures arrive as a JSON
//! error envelope and are mapped onto the closed classification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;

use crate::error::CredentialError;
use crate::identity::Identity;
use crate::service::CredentialService;
use crate::Result;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the REST auth client
#[derive(Debug, Clone)]
pub struct AuthClientConfig {
    /// Base service URL (e.g., "https://identity.example.com")
    pub base_url: String,
    /// API key appended to every request
    pub api_key: String,
    /// Request timeout; no machine-level timeout exists above this,
    /// the transport's is the only one
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl AuthClientConfig {
    /// Create a new config with a base URL and API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("GymTrack/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest {
    email: String,
    password: String,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    profile_picture: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest {
    id_token: String,
    display_name: String,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RevokeTokenRequest {
    id_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOobCodeRequest {
    request_type: String,
    email: String,
}

/// Provider error envelope: `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// =============================================================================
// Client
// =============================================================================

/// Token pair issued by the provider on sign-in/sign-up
#[derive(Debug, Clone)]
struct TokenPair {
    id_token: String,
    #[allow(dead_code)] // no refresh flow by design, kept for revocation payload parity
    refresh_token: String,
}

/// REST-backed [`CredentialService`] implementation
///
/// Holds the token pair issued by the most recent sign-in or sign-up so
/// the follow-up profile-update and revocation calls can authenticate.
///
/// # Example
///
/// ```rust,no_run
/// use auth_client::{AuthClientConfig, RestAuthClient, CredentialService};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AuthClientConfig::new("https://identity.example.com", "api-key");
///     let client = RestAuthClient::new(config)?;
///
///     let identity = client.authenticate("ana@test.com", "password123").await?;
///     println!("Signed in as {}", identity.uid);
///     Ok(())
/// }
/// ```
pub struct RestAuthClient {
    config: AuthClientConfig,
    http: reqwest::Client,
    tokens: RwLock<Option<TokenPair>>,
}

impl RestAuthClient {
    /// Create a new REST auth client
    pub fn new(config: AuthClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CredentialError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http,
            tokens: RwLock::new(None),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.config.base_url, action, self.config.api_key
        )
    }

    /// POST a JSON body and decode either the success payload or the error
    /// envelope into a classified error.
    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let envelope: ErrorEnvelope = response
                .json()
                .await
                .unwrap_or(ErrorEnvelope {
                    error: ErrorBody {
                        message: String::new(),
                    },
                });
            Err(classify_envelope(status.as_u16(), &envelope.error.message))
        }
    }

    fn store_tokens(&self, response: &SessionResponse) {
        let mut tokens = self.tokens.write().unwrap();
        *tokens = Some(TokenPair {
            id_token: response.id_token.clone(),
            refresh_token: response.refresh_token.clone(),
        });
    }

    fn current_id_token(&self) -> Option<String> {
        self.tokens.read().unwrap().as_ref().map(|t| t.id_token.clone())
    }

    fn identity_from(response: &SessionResponse) -> Identity {
        Identity {
            uid: response.local_id.clone(),
            display_name: response.display_name.clone().unwrap_or_default(),
            email: response.email.clone().unwrap_or_default(),
            photo_url: response.profile_picture.clone(),
        }
    }
}

/// Map a provider error envelope onto the closed classification
///
/// The envelope's `message` field carries the machine-readable code,
/// sometimes with a detail suffix ("WEAK_PASSWORD : Password should be...").
fn classify_envelope(status: u16, message: &str) -> CredentialError {
    let code = message
        .split([' ', ':'])
        .next()
        .unwrap_or("")
        .trim();

    if code.is_empty() {
        return CredentialError::Unclassified {
            code: format!("HTTP_{status}"),
            message: message.to_string(),
        };
    }

    CredentialError::from_provider_code(code, message)
}

#[async_trait]
impl CredentialService for RestAuthClient {
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity> {
        let request = PasswordRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };

        let response: SessionResponse = self.post("signUp", &request).await?;
        tracing::debug!(uid = %response.local_id, "identity created");

        self.store_tokens(&response);
        Ok(Self::identity_from(&response))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let request = PasswordRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };

        let response: SessionResponse = self.post("signInWithPassword", &request).await?;
        tracing::debug!(uid = %response.local_id, "authenticated");

        self.store_tokens(&response);
        Ok(Self::identity_from(&response))
    }

    async fn invalidate(&self) -> Result<()> {
        // Nothing to revoke when no session was ever established.
        let Some(id_token) = self.current_id_token() else {
            return Ok(());
        };

        let request = RevokeTokenRequest { id_token };
        let result: Result<serde_json::Value> = self.post("revokeToken", &request).await;

        // Local tokens are dropped regardless of the remote outcome.
        {
            let mut tokens = self.tokens.write().unwrap();
            *tokens = None;
        }

        result.map(|_| ())
    }

    async fn update_display_name(&self, uid: &str, name: &str) -> Result<()> {
        let id_token = self.current_id_token().ok_or_else(|| {
            CredentialError::Unclassified {
                code: "NO_SESSION".to_string(),
                message: "no token held for profile update".to_string(),
            }
        })?;

        let request = UpdateProfileRequest {
            id_token,
            display_name: name.to_string(),
            return_secure_token: false,
        };

        let _: serde_json::Value = self.post("update", &request).await?;
        tracing::debug!(%uid, "display name updated");
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        let request = SendOobCodeRequest {
            request_type: "PASSWORD_RESET".to_string(),
            email: email.to_string(),
        };

        let _: serde_json::Value = self.post("sendOobCode", &request).await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
