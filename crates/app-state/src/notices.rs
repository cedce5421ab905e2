//! Transient user-facing notices
//!
//! Short-lived, categorized messages (toasts) emitted by the session state
//! machine for presentation. Nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Category of a notice, drives its presentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Positive outcome (green toast)
    Success,
    /// Failed outcome (red toast)
    Failure,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Category
    pub kind: NoticeKind,
    /// Message text
    pub message: String,
}

impl Notice {
    /// Create a success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Create a failure notice
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        let ok = Notice::success("Welcome back, Ana");
        assert_eq!(ok.kind, NoticeKind::Success);
        assert_eq!(ok.message, "Welcome back, Ana");

        let bad = Notice::failure("Could not sign in.");
        assert_eq!(bad.kind, NoticeKind::Failure);
    }
}
