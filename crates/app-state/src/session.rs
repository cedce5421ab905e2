//! Session/authentication state machine
//!
//! Owns the current authenticated [`Identity`], exposes the sign-in,
//! sign-up and sign-out operations, tracks the loading flag, and notifies
//! dependent UI of every phase change through a watch channel.
//!
//! The machine is explicitly constructed and passed by handle to whoever
//! needs it; there is no ambient singleton, so tests can run independent
//! instances side by side.

use std::sync::Arc;

use auth_client::{CredentialError, CredentialService, Identity, IdentityPatch};
use parking_lot::RwLock;
use profile_store::{ProfileStore, UserRecord};
use tokio::sync::{broadcast, watch};

use crate::notices::Notice;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by session operations
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SessionError {
    /// Sign-in failed; classifications are deliberately collapsed here
    #[error("Could not sign in")]
    AuthenticationFailed,

    /// A sign-in attempt is already in flight
    #[error("A sign-in attempt is already in flight")]
    OperationInFlight,

    /// The operation requires a signed-out session
    #[error("Already signed in")]
    AlreadySignedIn,

    /// The operation requires a signed-in session
    #[error("Not signed in")]
    NotSignedIn,

    /// Classified credential service error, re-raised for the caller
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Phase of the session state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// No identity is current
    SignedOut,
    /// A sign-in attempt is in flight (splash state)
    Authenticating,
    /// An identity is current
    SignedIn(Identity),
}

impl SessionPhase {
    /// Whether an identity is current
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionPhase::SignedIn(_))
    }

    /// The current identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionPhase::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

struct SessionInner {
    credentials: Arc<dyn CredentialService>,
    profiles: Arc<dyn ProfileStore>,
    phase: RwLock<SessionPhase>,
    phase_tx: watch::Sender<SessionPhase>,
    notice_tx: broadcast::Sender<Notice>,
}

/// The session state machine
///
/// Cheap to clone; all clones share the same state. Operations run on the
/// tokio runtime and never hold the phase lock across an await.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use app_state::Session;
/// use auth_client::{AuthClientConfig, RestAuthClient};
/// use profile_store::{ProfileStoreConfig, RestProfileStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = RestAuthClient::new(AuthClientConfig::new(
///     "https://identity.example.com",
///     "api-key",
/// ))?;
/// let profiles = RestProfileStore::new(ProfileStoreConfig::new("https://docs.example.com"))?;
///
/// let session = Session::new(Arc::new(credentials), Arc::new(profiles));
/// let identity = session.sign_in("ana@test.com", "password123").await?;
/// println!("Signed in as {}", identity.uid);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Create a new session state machine in the `SignedOut` phase
    pub fn new(credentials: Arc<dyn CredentialService>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (phase_tx, _) = watch::channel(SessionPhase::SignedOut);
        let (notice_tx, _) = broadcast::channel(16);

        Self {
            inner: Arc::new(SessionInner {
                credentials,
                profiles,
                phase: RwLock::new(SessionPhase::SignedOut),
                phase_tx,
                notice_tx,
            }),
        }
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.inner.phase.read().clone()
    }

    /// Current identity, if signed in
    pub fn identity(&self) -> Option<Identity> {
        self.inner.phase.read().identity().cloned()
    }

    /// True only while a sign-in attempt is in flight
    pub fn is_loading(&self) -> bool {
        matches!(*self.inner.phase.read(), SessionPhase::Authenticating)
    }

    /// Subscribe to phase changes
    ///
    /// Every transition is published; the route gate re-evaluates on each
    /// one without debouncing.
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// Subscribe to transient notices (toasts)
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notice_tx.subscribe()
    }

    fn set_phase(&self, next: SessionPhase) {
        *self.inner.phase.write() = next.clone();
        tracing::debug!(?next, "session phase changed");
        self.inner.phase_tx.send_replace(next);
    }

    fn notify(&self, notice: Notice) {
        // No receivers is fine; notices are transient.
        let _ = self.inner.notice_tx.send(notice);
    }

    /// Move into `Authenticating`, rejecting overlapping attempts
    fn begin_authentication(&self) -> Result<()> {
        {
            let mut phase = self.inner.phase.write();
            match &*phase {
                SessionPhase::SignedOut => *phase = SessionPhase::Authenticating,
                SessionPhase::Authenticating => return Err(SessionError::OperationInFlight),
                SessionPhase::SignedIn(_) => return Err(SessionError::AlreadySignedIn),
            }
        }
        self.inner.phase_tx.send_replace(SessionPhase::Authenticating);
        Ok(())
    }

    fn ensure_signed_out(&self) -> Result<()> {
        match &*self.inner.phase.read() {
            SessionPhase::SignedOut => Ok(()),
            SessionPhase::Authenticating => Err(SessionError::OperationInFlight),
            SessionPhase::SignedIn(_) => Err(SessionError::AlreadySignedIn),
        }
    }

    /// Sign in with email and password
    ///
    /// Valid only from `SignedOut`; a second call while `Authenticating`
    /// is rejected with [`SessionError::OperationInFlight`] rather than
    /// cancelling the attempt in flight.
    ///
    /// On failure every error classification collapses into one generic
    /// failure notice and [`SessionError::AuthenticationFailed`]; the
    /// phase returns to `SignedOut` and the loading flag clears.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.begin_authentication()?;

        match self.inner.credentials.authenticate(email, password).await {
            Ok(identity) => {
                self.set_phase(SessionPhase::SignedIn(identity.clone()));
                let message = if identity.display_name.is_empty() {
                    "Welcome back!".to_string()
                } else {
                    format!("Welcome back, {}!", identity.display_name)
                };
                self.notify(Notice::success(message));
                Ok(identity)
            }
            Err(err) => {
                tracing::warn!(%err, "sign-in failed");
                self.set_phase(SessionPhase::SignedOut);
                self.notify(Notice::failure("Could not sign in."));
                Err(SessionError::AuthenticationFailed)
            }
        }
    }

    /// Create an account, then set its display name
    ///
    /// Valid from `SignedOut`. On success the phase becomes `SignedIn`,
    /// an "account created" notice is emitted, the user profile document
    /// is written best-effort in the background, and the identity
    /// (carrying the requested display name) is returned.
    ///
    /// On failure the classified [`CredentialError`] is re-raised for the
    /// caller to present; the phase stays `SignedOut`.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<Identity> {
        self.ensure_signed_out()?;

        let created = self.inner.credentials.create_identity(email, password).await?;
        self.inner
            .credentials
            .update_display_name(&created.uid, name)
            .await?;

        let identity = Identity {
            display_name: name.to_string(),
            ..created
        };

        self.set_phase(SessionPhase::SignedIn(identity.clone()));
        self.notify(Notice::success("Account created successfully!"));

        // Best-effort: logged on failure, never retried, never surfaced.
        let profiles = Arc::clone(&self.inner.profiles);
        let record = UserRecord::local(&identity.uid, name, email);
        tokio::spawn(async move {
            if let Err(err) = profiles.put_user(&record).await {
                tracing::warn!(%err, uid = %record.uid, "user document write failed");
            }
        });

        Ok(identity)
    }

    /// Sign out
    ///
    /// Remote invalidation is best-effort: its result is returned so the
    /// caller may inspect it but is free to ignore it. The local
    /// transition to `SignedOut` happens unconditionally; the user must
    /// never stay stuck signed in after asking to leave. Calling this
    /// while already signed out (or while a sign-in is in flight, which
    /// cannot be cancelled) is a no-op.
    pub async fn sign_out(&self) -> std::result::Result<(), CredentialError> {
        if !self.phase().is_signed_in() {
            return Ok(());
        }

        let result = self.inner.credentials.invalidate().await;
        if let Err(err) = &result {
            tracing::warn!(%err, "remote sign-out failed; signing out locally anyway");
        }

        self.set_phase(SessionPhase::SignedOut);
        result
    }

    /// Replace the mutable identity fields with caller-supplied data
    ///
    /// Valid from `SignedIn`; synchronous, no network call. Used by
    /// profile-edit flows to reflect externally confirmed changes.
    /// Idempotent: applying the same patch twice equals applying it once.
    pub fn update_identity(&self, patch: &IdentityPatch) -> Result<Identity> {
        let current = self.identity().ok_or(SessionError::NotSignedIn)?;
        let updated = current.apply(patch);
        self.set_phase(SessionPhase::SignedIn(updated.clone()));
        Ok(updated)
    }

    /// Ask the credential service to send a password-reset mail
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.inner.credentials.request_password_reset(email).await?;
        self.notify(Notice::success("Password reset email sent."));
        Ok(())
    }
}
