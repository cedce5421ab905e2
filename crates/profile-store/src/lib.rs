//! Profile document store boundary
//!
//! The external document database holding user profile records. The core
//! only ever writes a single document per account, fire-and-forget: write
//! failures are logged by the caller, never retried, never surfaced.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Result type for profile store operations
pub type Result<T> = std::result::Result<T, ProfileStoreError>;

/// Errors from the profile document store
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Store rejected the write
    #[error("Store error ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },
}

/// The user profile document written to the `users` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Credential service identity id
    pub uid: String,
    /// Display name at account creation time
    pub name: String,
    /// Authentication provider tag
    pub auth_provider: String,
    /// Email address
    pub email: String,
}

impl UserRecord {
    /// Build the record for a locally created account
    pub fn local(uid: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            auth_provider: "local".to_string(),
            email: email.into(),
        }
    }
}

/// Narrow interface to the external profile document store
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write a user record into the `users` collection
    async fn put_user(&self, record: &UserRecord) -> Result<()>;
}

// =============================================================================
// REST Store
// =============================================================================

/// Configuration for the REST document store client
#[derive(Debug, Clone)]
pub struct ProfileStoreConfig {
    /// Base service URL
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ProfileStoreConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// REST-backed [`ProfileStore`]
///
/// Documents are POSTed as JSON to `{base}/v1/documents/users`.
pub struct RestProfileStore {
    config: ProfileStoreConfig,
    http: reqwest::Client,
}

impl RestProfileStore {
    /// Create a new REST profile store client
    pub fn new(config: ProfileStoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn put_user(&self, record: &UserRecord) -> Result<()> {
        let url = format!("{}/v1/documents/users", self.config.base_url);
        let response = self.http.post(url).json(record).send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(uid = %record.uid, "user document written");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ProfileStoreError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// In-memory [`ProfileStore`] for tests
///
/// Stores records keyed by uid; can be told to fail every write.
#[derive(Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<String, UserRecord>>,
    failing: bool,
}

impl MemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose writes always fail
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            failing: true,
        }
    }

    /// Get the stored record for a uid, if any
    pub fn get(&self, uid: &str) -> Option<UserRecord> {
        self.records.lock().unwrap().get(uid).cloned()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn put_user(&self, record: &UserRecord) -> Result<()> {
        if self.failing {
            return Err(ProfileStoreError::Rejected {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.uid.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_memory_store_put_and_get() {
        let store = MemoryProfileStore::new();
        let record = UserRecord::local("u1", "Ana", "ana@test.com");

        store.put_user(&record).await.unwrap();

        assert_eq!(store.get("u1"), Some(record));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_failing() {
        let store = MemoryProfileStore::failing();
        let record = UserRecord::local("u1", "Ana", "ana@test.com");

        assert!(store.put_user(&record).await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rest_store_posts_document() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/documents/users"))
            .and(body_partial_json(json!({
                "uid": "u1",
                "name": "Ana",
                "authProvider": "local",
                "email": "ana@test.com",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "users/u1"})))
            .expect(1)
            .mount(&server)
            .await;

        let store = RestProfileStore::new(ProfileStoreConfig::new(server.uri())).unwrap();
        store
            .put_user(&UserRecord::local("u1", "Ana", "ana@test.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rest_store_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/documents/users"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let store = RestProfileStore::new(ProfileStoreConfig::new(server.uri())).unwrap();
        let err = store
            .put_user(&UserRecord::local("u1", "Ana", "ana@test.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileStoreError::Rejected { status: 403, .. }));
    }

    #[test]
    fn test_record_serialization_shape() {
        let record = UserRecord::local("u1", "Ana", "ana@test.com");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["authProvider"], "local");
        assert_eq!(json["uid"], "u1");
    }
}
