//! Error types for the booking crate.

use crate::types::{EventId, EventValidationError};
use thiserror::Error;

/// Why a confirmed booking could not be handed to checkout
///
/// The `Display` text is what the visitor sees in the error toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Total is zero and free bookings are not accepted
    #[error("Invalid amount")]
    InvalidAmount,

    /// The hosted checkout widget did not load
    #[error("Payment gateway failed to load")]
    CheckoutUnavailable,

    /// Total cannot be expressed in paise
    #[error("Amount is too large to process")]
    AmountOverflow,
}

impl BookingError {
    /// Metric label for the failed confirmation
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid_amount",
            Self::CheckoutUnavailable => "checkout_unavailable",
            Self::AmountOverflow => "amount_overflow",
        }
    }
}

/// Errors raised by an event store
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No event carries the id
    #[error("event not found: {0}")]
    NotFound(EventId),

    /// The record failed creation rules
    #[error("invalid event: {0}")]
    Invalid(#[from] EventValidationError),

    /// Seed file could not be read
    #[error("failed to read events file: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not a JSON array of events
    #[error("failed to parse events: {0}")]
    Parse(#[from] serde_json::Error),
}
