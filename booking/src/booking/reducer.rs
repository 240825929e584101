//! Reducer for the booking flow.

use super::actions::BookingAction;
use super::environment::BookingEnvironment;
use super::types::{
    BookingContext, BookingDraft, BookingOutcome, BookingState, BookingStep, CheckoutId,
    CheckoutSession,
};
use crate::extras::ExtraKey;
use crate::metrics as booking_metrics;
use crate::payment::{CheckoutOutcome, PaymentRequest};
use crate::shell::{Notification, Route};
use std::sync::Arc;
use ticketbooth_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Toast shown after a captured payment
pub const PAYMENT_SUCCESS_MESSAGE: &str = "Payment Successful!";

/// Toast shown after the visitor dismissed checkout
pub const PAYMENT_CANCELLED_MESSAGE: &str = "Payment Cancelled";

/// Toast shown after a zero-total booking is confirmed directly
pub const FREE_BOOKING_MESSAGE: &str = "Booking confirmed!";

/// Toast shown when the flow is reopened while checkout is still open
pub const PAYMENT_IN_PROGRESS_MESSAGE: &str = "Payment in progress";

type Effects = SmallVec<[Effect<BookingAction>; 4]>;

/// Reducer for the booking flow
///
/// Steps, quantity and selection are plain state changes. The only effects
/// are toasts, navigation, the scroll lock and the checkout itself, whose
/// outcome comes back as `CheckoutSucceeded` or `CheckoutDismissed`.
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ========== Effects ==========

    fn notify(env: &BookingEnvironment, notification: Notification) -> Effect<BookingAction> {
        let notifier = Arc::clone(&env.notifier);
        async_effect! {
            notifier.notify(notification);
            None
        }
    }

    fn navigate(env: &BookingEnvironment, route: Route) -> Effect<BookingAction> {
        let navigator = Arc::clone(&env.navigator);
        async_effect! {
            navigator.navigate(route);
            None
        }
    }

    fn lock_scroll(env: &BookingEnvironment) -> Effect<BookingAction> {
        let scroll_lock = Arc::clone(&env.scroll_lock);
        async_effect! {
            scroll_lock.lock();
            None
        }
    }

    fn release_scroll(env: &BookingEnvironment) -> Effect<BookingAction> {
        let scroll_lock = Arc::clone(&env.scroll_lock);
        async_effect! {
            scroll_lock.release();
            None
        }
    }

    fn open_checkout(
        env: &BookingEnvironment,
        checkout_id: CheckoutId,
        request: PaymentRequest,
    ) -> Effect<BookingAction> {
        let provider = Arc::clone(env.payments.provider());
        async_effect! {
            let action = match provider.open(request).await {
                CheckoutOutcome::Succeeded { payment_reference } => {
                    BookingAction::CheckoutSucceeded {
                        checkout_id,
                        payment_reference,
                    }
                },
                CheckoutOutcome::Dismissed => BookingAction::CheckoutDismissed { checkout_id },
            };
            Some(action)
        }
    }

    // ========== Steps ==========

    fn open(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        if let Some(pending) = &state.checkout {
            tracing::info!(checkout_id = %pending.id, "Open refused: checkout in progress");
            return smallvec![Self::notify(
                env,
                Notification::info(PAYMENT_IN_PROGRESS_MESSAGE)
            )];
        }

        state.draft = Some(BookingDraft::new());
        tracing::debug!(event_id = %state.context.event_id, "Booking flow opened");
        smallvec![Self::lock_scroll(env)]
    }

    fn close(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        let Some(draft) = state.draft.take() else {
            tracing::debug!("Booking flow already closed");
            return SmallVec::new();
        };

        // A pending checkout still resolves through its own outcome
        if state.checkout.is_none() {
            booking_metrics::record_flow_abandoned(draft.step.as_str());
        }
        tracing::debug!(step = draft.step.as_str(), "Booking flow closed");
        smallvec![Self::release_scroll(env)]
    }

    fn set_step(state: &mut BookingState, step: BookingStep) {
        if let Some(draft) = state.draft.as_mut() {
            draft.step = step;
            tracing::debug!(step = step.as_str(), "Booking step changed");
        }
    }

    fn next(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        let Some(step) = state.step() else {
            return SmallVec::new();
        };

        let next = match step {
            BookingStep::Tickets if state.context.has_extras() => BookingStep::Extras,
            BookingStep::Tickets | BookingStep::Extras => BookingStep::Summary,
            BookingStep::Summary => return Self::confirm(state, env),
        };
        Self::set_step(state, next);
        SmallVec::new()
    }

    fn back(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        let Some(step) = state.step() else {
            return SmallVec::new();
        };

        let previous = match step {
            BookingStep::Tickets => return Self::close(state, env),
            BookingStep::Summary if state.context.has_extras() => BookingStep::Extras,
            BookingStep::Extras | BookingStep::Summary => BookingStep::Tickets,
        };
        Self::set_step(state, previous);
        SmallVec::new()
    }

    fn set_quantity(state: &mut BookingState, quantity: u32) {
        if let Some(draft) = state.draft.as_mut() {
            draft.quantity = quantity.max(1);
            tracing::debug!(quantity = draft.quantity, "Ticket quantity changed");
        }
    }

    fn toggle_extra(state: &mut BookingState, key: ExtraKey) {
        if !state.context.extras.contains(&key) {
            tracing::warn!(%key, "Ignored toggle of unknown extra");
            return;
        }

        if let Some(draft) = state.draft.as_mut() {
            let selected = if draft.selected.remove(&key) {
                false
            } else {
                draft.selected.insert(key.clone());
                true
            };
            tracing::debug!(%key, selected, "Extra toggled");
        }
    }

    fn replace_context(state: &mut BookingState, context: BookingContext) {
        state.context = context;
        let catalog = &state.context.extras;

        if let Some(draft) = state.draft.as_mut() {
            draft.selected.retain(|key| catalog.contains(key));
            if draft.step == BookingStep::Extras && catalog.is_empty() {
                draft.step = BookingStep::Summary;
            }
        }
        tracing::debug!(event_id = %state.context.event_id, "Booking context replaced");
    }

    // ========== Confirmation ==========

    fn confirm(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        let Some(draft) = state.draft.as_ref() else {
            return SmallVec::new();
        };
        if draft.step != BookingStep::Summary {
            tracing::warn!(step = draft.step.as_str(), "Ignored confirm before the summary step");
            return SmallVec::new();
        }
        if let Some(pending) = &state.checkout {
            tracing::warn!(checkout_id = %pending.id, "Ignored confirm: checkout in progress");
            return SmallVec::new();
        }

        let price = draft.price(&state.context);
        let quantity = draft.quantity;

        if price.total.is_zero() && env.config.allow_free_bookings {
            tracing::info!(
                event_id = %state.context.event_id,
                quantity,
                "Free booking confirmed without checkout"
            );
            let outcome = BookingOutcome::ConfirmedFree;
            booking_metrics::record_confirmation("free");
            booking_metrics::record_flow_finished(&outcome, quantity);

            state.draft = None;
            state.last_outcome = Some(outcome);
            return smallvec![Effect::chain(vec![
                Self::release_scroll(env),
                Self::notify(env, Notification::success(FREE_BOOKING_MESSAGE)),
                Self::navigate(env, Route::Home),
            ])];
        }

        match env.payments.prepare(&state.context, price.total) {
            Err(error) => {
                tracing::warn!(%error, total = %price.total, "Booking confirmation rejected");
                booking_metrics::record_confirmation(error.label());
                smallvec![Self::notify(env, Notification::error(error.to_string()))]
            },
            Ok(request) => {
                let checkout_id = CheckoutId::new();
                tracing::info!(
                    %checkout_id,
                    event_id = %state.context.event_id,
                    amount_minor_units = request.amount_minor_units,
                    quantity,
                    "Opening checkout"
                );
                booking_metrics::record_confirmation("dispatched");

                state.checkout = Some(CheckoutSession {
                    id: checkout_id,
                    amount: price.total,
                    quantity,
                });
                smallvec![Self::open_checkout(env, checkout_id, request)]
            },
        }
    }

    // ========== Checkout outcomes ==========

    /// Takes the pending session if `checkout_id` belongs to it
    fn take_session(state: &mut BookingState, checkout_id: CheckoutId) -> Option<CheckoutSession> {
        match &state.checkout {
            Some(session) if session.id == checkout_id => state.checkout.take(),
            _ => None,
        }
    }

    fn stale_outcome(
        state: &BookingState,
        env: &BookingEnvironment,
        checkout_id: CheckoutId,
    ) -> Effects {
        tracing::warn!(%checkout_id, "Ignored outcome of unknown checkout");
        if state.is_open() {
            SmallVec::new()
        } else {
            smallvec![Self::release_scroll(env)]
        }
    }

    fn checkout_succeeded(
        state: &mut BookingState,
        env: &BookingEnvironment,
        checkout_id: CheckoutId,
        payment_reference: String,
    ) -> Effects {
        let Some(session) = Self::take_session(state, checkout_id) else {
            return Self::stale_outcome(state, env, checkout_id);
        };

        tracing::info!(
            %checkout_id,
            %payment_reference,
            amount = %session.amount,
            "Payment captured"
        );
        let outcome = BookingOutcome::Paid {
            reference: payment_reference,
            amount: session.amount,
        };
        booking_metrics::record_flow_finished(&outcome, session.quantity);

        state.draft = None;
        state.last_outcome = Some(outcome);

        smallvec![Effect::chain(vec![
            Self::release_scroll(env),
            Self::notify(env, Notification::success(PAYMENT_SUCCESS_MESSAGE)),
            Self::navigate(env, Route::Home),
        ])]
    }

    fn checkout_dismissed(
        state: &mut BookingState,
        env: &BookingEnvironment,
        checkout_id: CheckoutId,
    ) -> Effects {
        let Some(session) = Self::take_session(state, checkout_id) else {
            return Self::stale_outcome(state, env, checkout_id);
        };

        tracing::info!(%checkout_id, amount = %session.amount, "Checkout dismissed");
        let outcome = BookingOutcome::Cancelled;
        booking_metrics::record_flow_finished(&outcome, session.quantity);

        state.draft = None;
        state.last_outcome = Some(outcome);

        smallvec![Effect::chain(vec![
            Self::release_scroll(env),
            Self::notify(env, Notification::info(PAYMENT_CANCELLED_MESSAGE)),
        ])]
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if !state.is_open() && !action.applies_when_closed() {
            tracing::warn!(?action, "Ignored booking action: flow is closed");
            return SmallVec::new();
        }

        match action {
            // ========== Commands ==========
            BookingAction::Open => Self::open(state, env),
            BookingAction::Close => Self::close(state, env),
            BookingAction::Next => Self::next(state, env),
            BookingAction::Back => Self::back(state, env),
            BookingAction::Confirm => Self::confirm(state, env),

            BookingAction::SetQuantity(requested) => {
                let quantity = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
                Self::set_quantity(state, quantity);
                SmallVec::new()
            },
            BookingAction::IncrementQuantity => {
                let quantity = state.quantity().unwrap_or(1).saturating_add(1);
                Self::set_quantity(state, quantity);
                SmallVec::new()
            },
            BookingAction::DecrementQuantity => {
                let quantity = state.quantity().unwrap_or(1).saturating_sub(1);
                Self::set_quantity(state, quantity);
                SmallVec::new()
            },
            BookingAction::ToggleExtra(key) => {
                Self::toggle_extra(state, key);
                SmallVec::new()
            },
            BookingAction::ReplaceContext(context) => {
                Self::replace_context(state, context);
                SmallVec::new()
            },

            // ========== Checkout callbacks ==========
            BookingAction::CheckoutSucceeded {
                checkout_id,
                payment_reference,
            } => Self::checkout_succeeded(state, env, checkout_id, payment_reference),
            BookingAction::CheckoutDismissed { checkout_id } => {
                Self::checkout_dismissed(state, env, checkout_id)
            },
        }
    }
}
