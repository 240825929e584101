//! Recording collaborators for tests.
//!
//! Every mock keeps what it was asked to do so a test can drive a store and
//! then assert on the toasts, routes and checkout calls it produced.

use crate::booking::{BookingConfig, BookingEnvironment};
use crate::payment::{
    CheckoutConfig, CheckoutOutcome, CheckoutProvider, PaymentBridge, PaymentRequest,
};
use crate::shell::{Navigator, Notification, NotificationLevel, Notifier, Route, ScrollLock};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Notifier that keeps every toast
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All toasts in the order they were shown
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Messages of the toasts with `level`
    #[must_use]
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        lock(&self.notifications)
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }
}

/// Navigator that keeps every requested route
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested routes in order
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        lock(&self.routes).push(route);
    }
}

/// Scroll lock that counts calls
#[derive(Debug, Default)]
pub struct RecordingScrollLock {
    locked: AtomicBool,
    locks: AtomicUsize,
    releases: AtomicUsize,
}

impl RecordingScrollLock {
    /// Creates an unlocked recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether scrolling is currently locked
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Number of `lock` calls
    #[must_use]
    pub fn lock_calls(&self) -> usize {
        self.locks.load(Ordering::SeqCst)
    }

    /// Number of `release` calls
    #[must_use]
    pub fn release_calls(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl ScrollLock for RecordingScrollLock {
    fn lock(&self) {
        self.locks.fetch_add(1, Ordering::SeqCst);
        self.locked.store(true, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.locked.store(false, Ordering::SeqCst);
    }
}

/// Checkout provider with a fixed outcome that records every request
#[derive(Debug)]
pub struct ScriptedCheckout {
    available: bool,
    outcome: CheckoutOutcome,
    delay: Duration,
    requests: Mutex<Vec<PaymentRequest>>,
    open_calls: AtomicUsize,
}

impl ScriptedCheckout {
    fn scripted(available: bool, outcome: CheckoutOutcome) -> Self {
        Self {
            available,
            outcome,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
            open_calls: AtomicUsize::new(0),
        }
    }

    /// Every checkout is paid with `payment_reference`
    #[must_use]
    pub fn succeeding(payment_reference: impl Into<String>) -> Self {
        Self::scripted(
            true,
            CheckoutOutcome::Succeeded {
                payment_reference: payment_reference.into(),
            },
        )
    }

    /// Every checkout is dismissed
    #[must_use]
    pub fn dismissing() -> Self {
        Self::scripted(true, CheckoutOutcome::Dismissed)
    }

    /// The widget never loaded
    #[must_use]
    pub fn unavailable() -> Self {
        Self::scripted(false, CheckoutOutcome::Dismissed)
    }

    /// Resolves each checkout only after `delay`
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times the widget was opened
    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Requests the widget was opened with
    #[must_use]
    pub fn requests(&self) -> Vec<PaymentRequest> {
        lock(&self.requests).clone()
    }
}

impl CheckoutProvider for ScriptedCheckout {
    fn is_available(&self) -> bool {
        self.available
    }

    fn open(&self, request: PaymentRequest) -> BoxFuture<'static, CheckoutOutcome> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requests).push(request);

        let outcome = self.outcome.clone();
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        })
    }
}

/// All recording collaborators of one booking environment
#[derive(Clone)]
pub struct TestCollaborators {
    /// Toasts
    pub notifier: Arc<RecordingNotifier>,
    /// Routes
    pub navigator: Arc<RecordingNavigator>,
    /// Scroll lock
    pub scroll_lock: Arc<RecordingScrollLock>,
    /// Checkout widget
    pub checkout: Arc<ScriptedCheckout>,
}

impl TestCollaborators {
    /// Fresh recorders around `checkout`
    #[must_use]
    pub fn new(checkout: ScriptedCheckout) -> Self {
        Self {
            notifier: Arc::new(RecordingNotifier::new()),
            navigator: Arc::new(RecordingNavigator::new()),
            scroll_lock: Arc::new(RecordingScrollLock::new()),
            checkout: Arc::new(checkout),
        }
    }

    /// Booking environment wired to these recorders
    #[must_use]
    pub fn environment(&self, config: BookingConfig) -> BookingEnvironment {
        BookingEnvironment::new(
            self.notifier.clone(),
            self.navigator.clone(),
            self.scroll_lock.clone(),
            PaymentBridge::new(self.checkout.clone(), CheckoutConfig::default()),
            config,
        )
    }
}
