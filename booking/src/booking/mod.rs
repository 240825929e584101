//! The booking wizard: steps, ticket quantity, extras selection and
//! confirmation.
//!
//! ```text
//! Tickets ──next──▶ Extras ──next──▶ Summary ──confirm──▶ checkout
//!    │   └────────────next (no extras)───▶│
//!    └─back──▶ closed          any ──close──▶ closed
//! ```
//!
//! Prices are never stored. [`PriceBreakdown`] is computed from the draft and
//! the event context whenever it is read, so every quantity or selection
//! change is reflected immediately.

mod actions;
mod environment;
mod reducer;
mod types;


pub use actions::BookingAction;
pub use environment::{BookingConfig, BookingEnvironment};
pub use reducer::{
    BookingReducer, FREE_BOOKING_MESSAGE, PAYMENT_CANCELLED_MESSAGE, PAYMENT_IN_PROGRESS_MESSAGE,
    PAYMENT_SUCCESS_MESSAGE,
};
pub use types::{
    BookingContext, BookingDraft, BookingOutcome, BookingState, BookingStep, CheckoutId,
    CheckoutSession, PriceBreakdown,
};
