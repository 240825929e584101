//! Collaborators the booking flow talks to: toasts, navigation and the
//! page scroll lock.

use crate::types::EventId;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Severity of a toast
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Positive outcome
    Success,
    /// Failure or cancellation
    Error,
    /// Neutral information
    Info,
}

/// A transient, fire-and-forget message for the visitor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Text shown to the visitor
    pub message: String,
}

impl Notification {
    /// Success toast
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Error toast
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Informational toast
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Toast surface
pub trait Notifier: Send + Sync {
    /// Shows a notification
    fn notify(&self, notification: Notification);
}

/// Client-side routes the booking flow can send the visitor to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Site root
    Home,
    /// Details page of one event
    Event(EventId),
}

impl Route {
    /// URL path of the route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Event(id) => format!("/event/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Client-side router
pub trait Navigator: Send + Sync {
    /// Requests a route change
    fn navigate(&self, route: Route);
}

/// Page-level scroll lock held while the booking overlay is open
///
/// Both operations must be idempotent.
pub trait ScrollLock: Send + Sync {
    /// Stops the page behind the overlay from scrolling
    fn lock(&self);

    /// Restores page scrolling
    fn release(&self);
}

/// Notifier that writes toasts to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(toast = "success", message = %notification.message);
            },
            NotificationLevel::Error => {
                tracing::warn!(toast = "error", message = %notification.message);
            },
            NotificationLevel::Info => {
                tracing::info!(toast = "info", message = %notification.message);
            },
        }
    }
}

/// Navigator that logs route changes
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(path = %route, "Navigating");
    }
}

/// In-process scroll lock flag
#[derive(Debug, Default)]
pub struct PageScrollLock {
    locked: AtomicBool,
}

impl PageScrollLock {
    /// Creates an unlocked page
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Whether scrolling is currently locked
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

impl ScrollLock for PageScrollLock {
    fn lock(&self) {
        if !self.locked.swap(true, Ordering::AcqRel) {
            tracing::trace!("Page scroll locked");
        }
    }

    fn release(&self) {
        if self.locked.swap(false, Ordering::AcqRel) {
            tracing::trace!("Page scroll released");
        }
    }
}
