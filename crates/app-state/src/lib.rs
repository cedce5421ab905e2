//! Application state management for GymTrack
//!
//! This crate owns the session/authentication state machine and the
//! transient notice channel the UI subscribes to.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod notices;
pub mod session;

pub use notices::{Notice, NoticeKind};
pub use session::{Session, SessionError, SessionPhase};
