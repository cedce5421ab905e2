//! Test doubles for the credential service
//!
//! `StubCredentialService` is a scriptable in-memory provider used by the
//! session state machine tests and the workspace integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::CredentialError;
use crate::identity::Identity;
use crate::service::CredentialService;
use crate::Result;

struct StubAccount {
    password: String,
    identity: Identity,
}

/// In-memory [`CredentialService`] with programmable failures
///
/// Accounts are seeded up front or created through `create_identity`;
/// revocation calls are counted so tests can assert best-effort behavior.
#[derive(Default)]
pub struct StubCredentialService {
    accounts: Mutex<HashMap<String, StubAccount>>,
    sign_up_failure: Mutex<Option<CredentialError>>,
    fail_invalidate: AtomicBool,
    invalidate_calls: AtomicUsize,
    next_uid: AtomicUsize,
}

impl StubCredentialService {
    /// Create an empty stub
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account that `authenticate` will accept
    pub fn with_account(self, email: &str, password: &str, identity: Identity) -> Self {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            StubAccount {
                password: password.to_string(),
                identity,
            },
        );
        self
    }

    /// Make the next `create_identity` calls fail with the given error
    pub fn with_sign_up_failure(self, error: CredentialError) -> Self {
        *self.sign_up_failure.lock().unwrap() = Some(error);
        self
    }

    /// Make `invalidate` fail
    pub fn with_failing_invalidate(self) -> Self {
        self.fail_invalidate.store(true, Ordering::SeqCst);
        self
    }

    /// Number of times `invalidate` was called
    pub fn invalidate_calls(&self) -> usize {
        self.invalidate_calls.load(Ordering::SeqCst)
    }

    /// Look up the stored identity for an email, if any
    pub fn identity_for(&self, email: &str) -> Option<Identity> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.identity.clone())
    }
}

#[async_trait]
impl CredentialService for StubCredentialService {
    async fn create_identity(&self, email: &str, password: &str) -> Result<Identity> {
        if let Some(err) = self.sign_up_failure.lock().unwrap().clone() {
            return Err(err);
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(CredentialError::EmailInUse);
        }

        let uid = format!("u{}", self.next_uid.fetch_add(1, Ordering::SeqCst) + 1);
        let identity = Identity::new(uid, "", email);
        accounts.insert(
            email.to_string(),
            StubAccount {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );

        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.identity.clone()),
            _ => Err(CredentialError::WrongCredential),
        }
    }

    async fn invalidate(&self) -> Result<()> {
        self.invalidate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_invalidate.load(Ordering::SeqCst) {
            Err(CredentialError::Network("revocation unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn update_display_name(&self, uid: &str, name: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        for account in accounts.values_mut() {
            if account.identity.uid == uid {
                account.identity.display_name = name.to_string();
                return Ok(());
            }
        }
        Err(CredentialError::Unclassified {
            code: "USER_NOT_FOUND".to_string(),
            message: format!("no identity {uid}"),
        })
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        if self.accounts.lock().unwrap().contains_key(email) {
            Ok(())
        } else {
            Err(CredentialError::WrongCredential)
        }
    }
}
