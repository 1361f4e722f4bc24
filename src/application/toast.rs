//! Transient status line shown after user actions.

use std::time::{Duration, Instant};

/// How long a success notice stays visible.
pub const SUCCESS_TTL: Duration = Duration::from_secs(2);

/// How long an error notice stays visible.
pub const ERROR_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Pending,
    Success,
    Error,
}

/// A single notification.
///
/// Pending toasts have no deadline; they are replaced when the action
/// completes. Dismissal never affects the underlying operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    expires_at: Option<Instant>,
}

impl Toast {
    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Pending,
            message: message.into(),
            expires_at: None,
        }
    }

    pub fn success(message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            expires_at: Some(now + SUCCESS_TTL),
        }
    }

    pub fn error(message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            expires_at: Some(now + ERROR_TTL),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|t| now >= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_dismisses_after_two_seconds() {
        let now = Instant::now();
        let toast = Toast::success("done", now);
        assert!(!toast.is_expired(now + Duration::from_millis(1999)));
        assert!(toast.is_expired(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_error_dismisses_after_three_seconds() {
        let now = Instant::now();
        let toast = Toast::error("nope", now);
        assert!(!toast.is_expired(now + Duration::from_millis(2999)));
        assert!(toast.is_expired(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_pending_never_expires() {
        let now = Instant::now();
        let toast = Toast::pending("working");
        assert!(!toast.is_expired(now + Duration::from_secs(3600)));
    }
}
