//! Collaborators injected into the booking reducer.

use crate::payment::PaymentBridge;
use crate::shell::{Navigator, Notifier, ScrollLock};
use std::sync::Arc;

/// Booking rules that vary per deployment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BookingConfig {
    /// Confirm zero-total bookings without checkout instead of rejecting them
    pub allow_free_bookings: bool,
}

/// Environment dependencies for the booking flow
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Toast surface
    pub notifier: Arc<dyn Notifier>,
    /// Client-side router
    pub navigator: Arc<dyn Navigator>,
    /// Page scroll lock held while the flow is open
    pub scroll_lock: Arc<dyn ScrollLock>,
    /// Checkout bridge
    pub payments: PaymentBridge,
    /// Booking rules
    pub config: BookingConfig,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        scroll_lock: Arc<dyn ScrollLock>,
        payments: PaymentBridge,
        config: BookingConfig,
    ) -> Self {
        Self {
            notifier,
            navigator,
            scroll_lock,
            payments,
            config,
        }
    }
}
