//! Business metrics for the booking flow.
//!
//! Recorded through the `metrics` facade; without an installed recorder every
//! call is a no-op.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `booking_flows_total{outcome}` - Finished flows (paid, confirmed_free, cancelled, abandoned)
//! - `booking_confirmations_total{result}` - Confirm attempts (dispatched, free, invalid_amount, checkout_unavailable, amount_overflow)
//! - `booking_payment_revenue_paise_total` - Captured revenue in paise
//! - `booking_tickets_sold_total` - Tickets in paid or free-confirmed flows
//!
//! ## Gauges
//! - `booking_pending_checkouts` - Checkouts awaiting an outcome

use crate::booking::BookingOutcome;
use metrics::{describe_counter, describe_gauge};

/// Register descriptions of all booking metrics.
///
/// Call once at startup, before any metrics are recorded.
pub fn register_booking_metrics() {
    describe_counter!(
        "booking_flows_total",
        "Finished booking flows by outcome (paid, confirmed_free, cancelled, abandoned)"
    );
    describe_counter!(
        "booking_confirmations_total",
        "Confirm attempts by result"
    );
    describe_counter!(
        "booking_payment_revenue_paise_total",
        "Revenue from captured payments in paise"
    );
    describe_counter!(
        "booking_tickets_sold_total",
        "Tickets in paid or free-confirmed bookings"
    );
    describe_gauge!(
        "booking_pending_checkouts",
        "Checkouts handed to the provider and awaiting an outcome"
    );

    tracing::info!("Booking metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a confirm attempt.
///
/// # Arguments
///
/// * `result` - `dispatched`, `free`, or the label of the rejecting error
pub fn record_confirmation(result: &'static str) {
    metrics::counter!("booking_confirmations_total", "result" => result).increment(1);
    if result == "dispatched" {
        metrics::gauge!("booking_pending_checkouts").increment(1.0);
    }
    tracing::debug!(result, "Recorded booking_confirmation metric");
}

/// Record a flow that reached a terminal outcome.
///
/// Paid flows add their amount to revenue; paid and free flows add
/// `quantity` to tickets sold. Paid and cancelled flows resolve a pending
/// checkout.
pub fn record_flow_finished(outcome: &BookingOutcome, quantity: u32) {
    metrics::counter!("booking_flows_total", "outcome" => outcome.label()).increment(1);

    match outcome {
        BookingOutcome::Paid { amount, .. } => {
            let amount_paise = amount.to_paise().unwrap_or_default();
            metrics::counter!("booking_payment_revenue_paise_total").increment(amount_paise);
            metrics::counter!("booking_tickets_sold_total").increment(u64::from(quantity));
            metrics::gauge!("booking_pending_checkouts").decrement(1.0);
        },
        BookingOutcome::ConfirmedFree => {
            metrics::counter!("booking_tickets_sold_total").increment(u64::from(quantity));
        },
        BookingOutcome::Cancelled => {
            metrics::gauge!("booking_pending_checkouts").decrement(1.0);
        },
    }
    tracing::debug!(outcome = outcome.label(), quantity, "Recorded flow_finished metric");
}

/// Record a flow closed before confirmation.
pub fn record_flow_abandoned(step: &'static str) {
    metrics::counter!("booking_flows_total", "outcome" => "abandoned").increment(1);
    tracing::debug!(step, "Recorded flow_abandoned metric");
}
