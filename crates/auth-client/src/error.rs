//! Credential service error classification
//!
//! The hosted provider reports failures through an error envelope with a
//! machine-readable code. This module maps that loose shape onto a closed
//! classification so call sites never inspect untyped error data.

use thiserror::Error;

/// Classified errors returned by the credential service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The email address is already registered
    #[error("Email already in use")]
    EmailInUse,

    /// The email address is malformed
    #[error("Invalid email address")]
    InvalidEmail,

    /// The password does not meet the provider's strength requirements
    #[error("Password too weak")]
    WeakPassword,

    /// Wrong email/password combination (or unknown account)
    #[error("Wrong credentials")]
    WrongCredential,

    /// Transport-level failure (connect, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Provider error with no known classification
    #[error("Credential service error {code}: {message}")]
    Unclassified {
        /// Raw provider error code
        code: String,
        /// Human-readable message from the provider
        message: String,
    },
}

impl CredentialError {
    /// Classify a provider error code from the error envelope
    ///
    /// Unknown codes become [`CredentialError::Unclassified`] with the raw
    /// code and message preserved.
    pub fn from_provider_code(code: &str, message: &str) -> Self {
        match code {
            "EMAIL_EXISTS" => CredentialError::EmailInUse,
            "INVALID_EMAIL" => CredentialError::InvalidEmail,
            "WEAK_PASSWORD" => CredentialError::WeakPassword,
            "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" => {
                CredentialError::WrongCredential
            }
            _ => CredentialError::Unclassified {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    /// User-facing message for sign-up failure presentation
    ///
    /// One message per classification; unclassified errors carry the
    /// provider's own message through.
    pub fn user_message(&self) -> String {
        match self {
            CredentialError::EmailInUse => "Email already in use.".to_string(),
            CredentialError::InvalidEmail => "Invalid email.".to_string(),
            CredentialError::WeakPassword => {
                "Weak password. It must be at least 8 characters long.".to_string()
            }
            CredentialError::WrongCredential => "Wrong email or password.".to_string(),
            CredentialError::Network(_) => "Could not reach the server.".to_string(),
            CredentialError::Unclassified { message, .. } => {
                format!("Could not create account: {message}")
            }
        }
    }
}

impl From<reqwest::Error> for CredentialError {
    fn from(err: reqwest::Error) -> Self {
        CredentialError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_classified() {
        assert_eq!(
            CredentialError::from_provider_code("EMAIL_EXISTS", "exists"),
            CredentialError::EmailInUse
        );
        assert_eq!(
            CredentialError::from_provider_code("INVALID_EMAIL", "bad"),
            CredentialError::InvalidEmail
        );
        assert_eq!(
            CredentialError::from_provider_code("WEAK_PASSWORD", "weak"),
            CredentialError::WeakPassword
        );
        assert_eq!(
            CredentialError::from_provider_code("INVALID_PASSWORD", "nope"),
            CredentialError::WrongCredential
        );
        assert_eq!(
            CredentialError::from_provider_code("EMAIL_NOT_FOUND", "nope"),
            CredentialError::WrongCredential
        );
    }

    #[test]
    fn test_unknown_code_preserved() {
        let err = CredentialError::from_provider_code("QUOTA_EXCEEDED", "too many requests");
        assert_eq!(
            err,
            CredentialError::Unclassified {
                code: "QUOTA_EXCEEDED".to_string(),
                message: "too many requests".to_string(),
            }
        );
    }

    #[test]
    fn test_user_messages_distinct() {
        let messages = [
            CredentialError::EmailInUse.user_message(),
            CredentialError::InvalidEmail.user_message(),
            CredentialError::WeakPassword.user_message(),
            CredentialError::WrongCredential.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
