//! User-facing notifications.
//!
//! The controller reports outcomes (cart updated, login required, backend
//! unreachable) as transient notifications rather than propagating errors.
//! The presentation layer drains them from [`Notifications`].

use std::fmt;

use tokio::sync::mpsc;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Sending half, held by the controller.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Receiving half, drained by the presentation layer.
#[derive(Debug)]
pub struct Notifications {
    rx: mpsc::UnboundedReceiver<Notification>,
}

/// Create a connected notifier/receiver pair.
#[must_use]
pub fn channel() -> (Notifier, Notifications) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, Notifications { rx })
}

impl Notifier {
    /// Report a successful operation.
    pub fn success(&self, message: impl Into<String>) {
        self.send(Severity::Success, message.into());
    }

    /// Report an operation that was refused before any request was made.
    pub fn warning(&self, message: impl Into<String>) {
        self.send(Severity::Warning, message.into());
    }

    /// Report a failed request.
    pub fn error(&self, message: impl Into<String>) {
        self.send(Severity::Error, message.into());
    }

    fn send(&self, severity: Severity, message: String) {
        match severity {
            Severity::Success => tracing::info!(%message, "notify"),
            Severity::Warning => tracing::warn!(%message, "notify"),
            Severity::Error => tracing::error!(%message, "notify"),
        }

        // A dropped receiver means nobody is displaying notifications.
        let _ = self.tx.send(Notification { severity, message });
    }
}

impl Notifications {
    /// Take every notification queued so far without waiting.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.rx.try_recv() {
            drained.push(notification);
        }
        drained
    }

    /// Wait for the next notification.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }
}
