//! The authenticated user identity
//!
//! `Identity` is the only entity in the system with lifecycle semantics:
//! created by a successful sign-in or sign-up, replaced wholesale on
//! sign-in, cleared on sign-out, and patched (name/photo only) in place.

use serde::{Deserialize, Serialize};

/// The authenticated user's identity
///
/// The `uid` is immutable once issued by the credential service; display
/// name and photo reference may be updated in place via [`IdentityPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique id assigned by the credential service
    pub uid: String,
    /// Display name, possibly empty
    pub display_name: String,
    /// Email address, possibly empty
    pub email: String,
    /// Photo reference (URL), absent until the user sets one
    pub photo_url: Option<String>,
}

impl Identity {
    /// Create a new identity
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            email: email.into(),
            photo_url: None,
        }
    }

    /// Apply a patch, returning the updated identity
    ///
    /// Only display name and photo reference can change; `uid` and `email`
    /// are carried over untouched. Applying the same patch twice yields the
    /// same identity as applying it once.
    pub fn apply(&self, patch: &IdentityPatch) -> Identity {
        Identity {
            uid: self.uid.clone(),
            display_name: patch
                .display_name
                .clone()
                .unwrap_or_else(|| self.display_name.clone()),
            email: self.email.clone(),
            photo_url: match &patch.photo_url {
                Some(url) => Some(url.clone()),
                None => self.photo_url.clone(),
            },
        }
    }
}

/// A partial update to the mutable fields of an [`Identity`]
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPatch {
    /// New display name
    pub display_name: Option<String>,
    /// New photo reference
    pub photo_url: Option<String>,
}

impl IdentityPatch {
    /// Patch that only changes the display name
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            photo_url: None,
        }
    }

    /// Patch that only changes the photo reference
    pub fn photo_url(url: impl Into<String>) -> Self {
        Self {
            display_name: None,
            photo_url: Some(url.into()),
        }
    }
}
