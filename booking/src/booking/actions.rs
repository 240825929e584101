//! Inputs of the booking flow.

use super::types::{BookingContext, CheckoutId};
use crate::extras::ExtraKey;

/// Actions for the booking flow
///
/// Commands come from the visitor; the checkout variants are fed back by the
/// effect that opened the checkout widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    // Commands
    /// Start a fresh draft
    Open,
    /// Discard the draft from any step
    Close,
    /// Advance one step; on Summary this confirms
    Next,
    /// Retreat one step; on Tickets this closes
    Back,
    /// Set the ticket count, clamped to at least 1
    SetQuantity(i64),
    /// Add one ticket
    IncrementQuantity,
    /// Remove one ticket, never below 1
    DecrementQuantity,
    /// Flip the selection of one extra
    ToggleExtra(ExtraKey),
    /// Hand the booking to checkout
    Confirm,
    /// Event data changed; re-derive prices against the new context
    ReplaceContext(BookingContext),

    // Checkout callbacks
    /// Payment captured
    CheckoutSucceeded {
        /// Checkout attempt this outcome belongs to
        checkout_id: CheckoutId,
        /// Provider payment reference
        payment_reference: String,
    },
    /// Visitor dismissed the checkout overlay
    CheckoutDismissed {
        /// Checkout attempt this outcome belongs to
        checkout_id: CheckoutId,
    },
}

impl BookingAction {
    /// Whether this action may arrive while the flow is closed
    #[must_use]
    pub const fn applies_when_closed(&self) -> bool {
        matches!(
            self,
            Self::Open
                | Self::Close
                | Self::ReplaceContext(_)
                | Self::CheckoutSucceeded { .. }
                | Self::CheckoutDismissed { .. }
        )
    }

    /// Checkout attempt a callback belongs to
    #[must_use]
    pub const fn checkout_id(&self) -> Option<CheckoutId> {
        match self {
            Self::CheckoutSucceeded { checkout_id, .. } | Self::CheckoutDismissed { checkout_id } => {
                Some(*checkout_id)
            },
            _ => None,
        }
    }
}
