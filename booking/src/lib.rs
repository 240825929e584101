//! Ticket booking and pricing engine.
//!
//! Visitors pick a ticket count and optional add-ons for one event, see the
//! price recomputed on every change, and pay through a hosted checkout
//! widget. The engine is written as reducers driven by a `Store`:
//!
//! ```text
//! Event ──▶ ExtrasCatalog ──▶ BookingReducer ──▶ PaymentBridge ──▶ checkout
//!   ▲            (keys, groups)     (steps, price)     (request)        │
//!   │                                                                   │
//! DetailsReducer ◀──────── CheckoutSucceeded / CheckoutDismissed ◀──────┘
//! ```
//!
//! - [`pricing`] reads amounts out of free-form price text
//! - [`extras`] gives every add-on a stable key and groups them by category
//! - [`booking`] is the step machine and confirmation logic
//! - [`payment`] turns a confirmed total into a checkout request
//! - [`details`] loads the event and hosts the booking flow
//!
//! Toasts, navigation, the page scroll lock, the event store and the checkout
//! widget are all injected through environments, so the whole flow runs under
//! test with the recorders in [`mocks`].

#![forbid(unsafe_code)]

pub mod booking;
pub mod config;
pub mod details;
pub mod error;
pub mod extras;
pub mod metrics;
pub mod mocks;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod repository;
pub mod shell;
pub mod time;
pub mod types;

pub use booking::{
    BookingAction, BookingConfig, BookingContext, BookingEnvironment, BookingReducer,
    BookingState, BookingStep, PriceBreakdown,
};
pub use config::Config;
pub use details::{
    DetailsAction, DetailsEnvironment, DetailsPage, DetailsReducer, DetailsState, EventDetails,
};
pub use error::{BookingError, RepositoryError};
pub use money::Rupees;
pub use pricing::extract_price;
pub use types::{Event, EventId, EventStatus, Extra, ExtraCategory, ExtraId};
