//! Notification channel: an ordered queue of short-lived user-facing messages.
//!
//! Every component reports outcomes here instead of rendering inline errors.
//! Entries expire after a fixed TTL regardless of user interaction; callers
//! hold a cloned [`Notifier`] handle rather than reaching for a global.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::lock;

/// Default lifetime of a notification entry.
pub const DEFAULT_TTL: Duration = Duration::from_millis(4500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
}

struct Inner {
    entries: Mutex<Vec<Notification>>,
    ttl: Duration,
    shutdown: CancellationToken,
}

/// Cloneable handle to the notification queue.
///
/// Must be used from within a Tokio runtime: each `push` schedules its own
/// expiry task.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    /// Starts an empty channel whose entries live for `ttl`.
    pub fn start(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                ttl,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Appends a message and schedules its removal. Returns the entry id.
    pub fn push(&self, message: impl Into<String>, kind: NotificationKind) -> Uuid {
        let id = Uuid::new_v4();
        let message = message.into();

        if self.inner.shutdown.is_cancelled() {
            warn!("[NOTIFY] channel shut down, dropping {:?} notification", kind);
            return id;
        }

        info!("[NOTIFY] {:?}: {}", kind, message);
        lock(&self.inner.entries).push(Notification { id, message, kind });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = inner.shutdown.cancelled() => {}
                _ = tokio::time::sleep(inner.ttl) => {
                    let mut entries = lock(&inner.entries);
                    entries.retain(|n| n.id != id);
                    debug!("[NOTIFY] expired {}", id);
                }
            }
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(message, NotificationKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(message, NotificationKind::Info)
    }

    /// Pushes exactly one error entry describing `err`.
    pub fn report(&self, err: &AppError) -> Uuid {
        self.error(err.notification_text())
    }

    /// Removes an entry early. Returns false if it already expired.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = lock(&self.inner.entries);
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    /// Current entries in insertion order.
    pub fn entries(&self) -> Vec<Notification> {
        lock(&self.inner.entries).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancels pending expiry timers and clears the queue. Later pushes are
    /// dropped.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        lock(&self.inner.entries).clear();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::start(DEFAULT_TTL)
    }
}
