//! Form validation for the auth screens
//!
//! Per-field validation that runs before any network call; the session
//! state machine never sees a malformed submission. Each form exposes
//! `validate()` returning every failing field at once so the screen can
//! annotate all of them in a single pass.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Get the email shape regex (cached)
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
    })
}

/// Fields that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Display name field
    Name,
    /// Email field
    Email,
    /// Password field
    Password,
}

/// A single per-field validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Which field failed
    pub field: Field,
    /// Message to show under the field
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new(Field::Email, "Email is required"));
    } else if !email_regex().is_match(email.trim()) {
        errors.push(FieldError::new(Field::Email, "Enter a valid email"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new(Field::Password, "Password is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            Field::Password,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

/// Sign-in form data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    /// Email field value
    pub email: String,
    /// Password field value
    pub password: String,
}

impl SignInForm {
    /// Validate all fields, returning every failure
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Sign-up form data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Display name field value
    pub name: String,
    /// Email field value
    pub email: String,
    /// Password field value
    pub password: String,
}

impl SignUpForm {
    /// Validate all fields, returning every failure
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new(Field::Name, "Name is required"));
        }
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Password-reset form data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordResetForm {
    /// Email field value
    pub email: String,
}

impl PasswordResetForm {
    /// Validate all fields, returning every failure
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
