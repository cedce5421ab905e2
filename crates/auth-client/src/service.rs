//! The consumed credential service contract
//!
//! The session state machine talks to the authentication provider only
//! through this trait, so tests can substitute a scripted stub and the
//! REST client stays swappable.

use async_trait::async_trait;

use crate::identity::Identity;
use crate::Result;

/// Narrow interface to the external authentication provider
///
/// All methods classify failures as [`crate::CredentialError`]; callers
/// never see raw provider payloads.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Create a new identity from email and password
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity>;

    /// Authenticate with email and password
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity>;

    /// Invalidate the current remote session
    ///
    /// Best-effort from the caller's perspective; the session machine signs
    /// out locally whether or not this succeeds.
    async fn invalidate(&self) -> Result<()>;

    /// Update the display name on an existing identity
    async fn update_display_name(&self, uid: &str, name: &str) -> Result<()>;

    /// Ask the provider to send a password-reset mail
    async fn request_password_reset(&self, email: &str) -> Result<()>;
}
