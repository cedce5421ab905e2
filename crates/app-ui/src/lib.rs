//! User interface layer for GymTrack
//!
//! This crate provides the navigation shell and the auth-screen form
//! validation. Everything here is presentation-side glue over
//! `app-state`: the route gate is a pure function of the session phase,
//! and the forms reject malformed input before any network call.
//!
//! # Modules
//!
//! - [`navigation`] - Route gate, route definitions, and the tab bar
//! - [`forms`] - Per-field validation for sign-in / sign-up / reset
//!
//! # Example
//!
//! ```rust
//! use app_state::SessionPhase;
//! use app_ui::navigation::{route_gate, NavTree};
//!
//! // Nobody signed in yet: show the auth subtree.
//! assert_eq!(route_gate(&SessionPhase::SignedOut), NavTree::Auth);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod forms;
pub mod navigation;

// Re-export commonly used types
pub use forms::{Field, FieldError, PasswordResetForm, SignInForm, SignUpForm};
pub use navigation::{route_gate, AppRoute, AppTab, AuthRoute, NavTree};
