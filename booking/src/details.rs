//! Event details page: loads one event and hosts its booking flow.
//!
//! The page fetches once per [`DetailsAction::Load`]. Until the event is
//! ready, booking actions are ignored. Once ready, the booking reducer is
//! embedded and its effects are lifted into [`DetailsAction::Booking`].
//!
//! Loading another event closes the current flow first. If that flow has a
//! checkout open, it moves to [`DetailsState::detached`] so the outcome still
//! gets its toast, navigation and scroll release.

use crate::booking::{
    BookingAction, BookingContext, BookingEnvironment, BookingReducer, BookingState, CheckoutId,
};
use crate::extras::ExtrasPreview;
use crate::repository::EventRepository;
use crate::types::{Event, EventId, EventStatus};
use std::sync::Arc;
use ticketbooth_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Extras listed on the desktop summary panel before "+N more"
pub const EXTRAS_PREVIEW_LIMIT: usize = 4;

// ============================================================================
// State
// ============================================================================

/// A loaded event and its booking flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDetails {
    /// The event as fetched
    pub event: Event,
    /// Booking flow for this event
    pub booking: BookingState,
}

impl EventDetails {
    /// Wraps a freshly fetched event with a closed booking flow
    #[must_use]
    pub fn new(event: Event) -> Self {
        let booking = BookingState::new(BookingContext::from_event(&event));
        Self { event, booking }
    }

    /// Whether the booking overlay is showing
    #[must_use]
    pub const fn booking_in_progress(&self) -> bool {
        self.booking.is_open()
    }

    /// Per-ticket entry price: "₹1,500" or "Free"
    #[must_use]
    pub fn price_label(&self) -> String {
        self.booking.context.base_price.price_label()
    }

    /// Status badge text
    #[must_use]
    pub const fn status_badge(&self) -> &'static str {
        self.event.status.badge()
    }

    /// Call to action on the mobile sticky bar
    #[must_use]
    pub const fn mobile_cta(&self) -> &'static str {
        match self.event.status {
            EventStatus::Live => "🎟️ Book Now",
            EventStatus::Upcoming => "Book Tickets →",
        }
    }

    /// Call to action on the desktop panel
    #[must_use]
    pub const fn desktop_cta(&self) -> &'static str {
        match self.event.status {
            EventStatus::Live => "🎟️ Book Now — Live",
            EventStatus::Upcoming => "🎟️ Book Tickets",
        }
    }

    /// "Sat, 15 March 2025"
    #[must_use]
    pub fn date_label(&self) -> Option<String> {
        self.event.date_label()
    }

    /// "8:30 AM – 11:00 PM"
    #[must_use]
    pub fn schedule_label(&self) -> Option<String> {
        self.event.schedule_label()
    }

    /// Extras shown on the desktop panel
    #[must_use]
    pub fn extras_preview(&self) -> ExtrasPreview {
        self.booking.context.extras.preview(EXTRAS_PREVIEW_LIMIT)
    }
}

/// What the details page shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailsPage {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Fetch in flight
    Loading {
        /// Event being fetched
        event_id: EventId,
    },
    /// The store has no such event
    NotFound {
        /// Requested id
        event_id: EventId,
    },
    /// The fetch failed
    Failed {
        /// Requested id
        event_id: EventId,
        /// Error shown to the visitor
        message: String,
    },
    /// Event loaded; booking is possible
    Ready(Box<EventDetails>),
}

impl DetailsPage {
    /// Id of the requested or loaded event
    #[must_use]
    pub fn event_id(&self) -> Option<&EventId> {
        match self {
            Self::Idle => None,
            Self::Loading { event_id }
            | Self::NotFound { event_id }
            | Self::Failed { event_id, .. } => Some(event_id),
            Self::Ready(details) => Some(&details.event.id),
        }
    }

    /// Loaded details, if ready
    #[must_use]
    pub fn ready(&self) -> Option<&EventDetails> {
        match self {
            Self::Ready(details) => Some(details),
            _ => None,
        }
    }

    /// Booking flow, if ready
    #[must_use]
    pub fn booking(&self) -> Option<&BookingState> {
        self.ready().map(|details| &details.booking)
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// State of the details page
///
/// `detached` holds booking flows the page navigated away from while their
/// checkout was still open. Each one is dropped once its outcome arrives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailsState {
    /// Current page
    pub page: DetailsPage,
    /// Flows awaiting the outcome of a checkout opened before navigation
    pub detached: Vec<BookingState>,
}

impl From<DetailsPage> for DetailsState {
    fn from(page: DetailsPage) -> Self {
        Self {
            page,
            detached: Vec::new(),
        }
    }
}

impl DetailsState {
    /// Id of the requested or loaded event
    #[must_use]
    pub fn event_id(&self) -> Option<&EventId> {
        self.page.event_id()
    }

    /// Loaded details, if ready
    #[must_use]
    pub fn ready(&self) -> Option<&EventDetails> {
        self.page.ready()
    }

    /// Booking flow, if ready
    #[must_use]
    pub fn booking(&self) -> Option<&BookingState> {
        self.page.booking()
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.page.is_loading()
    }

    /// Position of the detached flow waiting on `checkout_id`
    fn detached_flow(&self, checkout_id: CheckoutId) -> Option<usize> {
        self.detached.iter().position(|booking| {
            booking
                .checkout
                .as_ref()
                .is_some_and(|session| session.id == checkout_id)
        })
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the details page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailsAction {
    /// Fetch an event
    Load(EventId),
    /// Fetch returned the event
    Loaded(Box<Event>),
    /// Fetch found no event with the id
    NotFound(EventId),
    /// Fetch failed
    LoadFailed {
        /// Requested id
        event_id: EventId,
        /// Error description
        message: String,
    },
    /// Call to action pressed
    OpenBooking,
    /// Booking flow input
    Booking(BookingAction),
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the details page
#[derive(Clone)]
pub struct DetailsEnvironment {
    /// Event store
    pub repository: Arc<dyn EventRepository>,
    /// Booking flow collaborators
    pub booking: BookingEnvironment,
}

impl DetailsEnvironment {
    /// Creates a new `DetailsEnvironment`
    #[must_use]
    pub fn new(repository: Arc<dyn EventRepository>, booking: BookingEnvironment) -> Self {
        Self {
            repository,
            booking,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

type Effects = SmallVec<[Effect<DetailsAction>; 4]>;

/// Reducer for the details page
#[derive(Clone, Debug, Default)]
pub struct DetailsReducer {
    booking: BookingReducer,
}

impl DetailsReducer {
    /// Creates a new `DetailsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            booking: BookingReducer::new(),
        }
    }

    fn fetch(env: &DetailsEnvironment, event_id: EventId) -> Effect<DetailsAction> {
        let request = env.repository.fetch(&event_id);
        async_effect! {
            let action = match request.await {
                Ok(Some(event)) => DetailsAction::Loaded(Box::new(event)),
                Ok(None) => DetailsAction::NotFound(event_id),
                Err(error) => DetailsAction::LoadFailed {
                    event_id,
                    message: error.to_string(),
                },
            };
            Some(action)
        }
    }

    /// Runs the booking reducer on `booking` and lifts its effects
    fn lift(
        &self,
        booking: &mut BookingState,
        action: BookingAction,
        env: &DetailsEnvironment,
    ) -> Effects {
        self.booking
            .reduce(booking, action, &env.booking)
            .into_iter()
            .map(|effect| effect.map(DetailsAction::Booking))
            .collect()
    }

    /// Routes a booking action to the page's flow, or to the detached flow
    /// whose checkout it resolves
    fn delegate(
        &self,
        state: &mut DetailsState,
        action: BookingAction,
        env: &DetailsEnvironment,
    ) -> Effects {
        if let Some(index) = action.checkout_id().and_then(|id| state.detached_flow(id)) {
            let mut detached = state.detached.swap_remove(index);
            tracing::info!(
                event_id = %detached.context.event_id,
                "Resolving checkout of a flow the page left"
            );
            return self.lift(&mut detached, action, env);
        }

        let DetailsPage::Ready(details) = &mut state.page else {
            tracing::warn!(?action, "Ignored booking action: event not ready");
            return SmallVec::new();
        };
        self.lift(&mut details.booking, action, env)
    }

    /// Closes the booking flow of a page that is being replaced
    ///
    /// A flow with an open checkout is kept in `detached` until the
    /// checkout's outcome arrives.
    fn leave(&self, state: &mut DetailsState, env: &DetailsEnvironment) -> Effects {
        let page = std::mem::take(&mut state.page);
        let DetailsPage::Ready(details) = page else {
            return SmallVec::new();
        };

        let EventDetails { event, mut booking } = *details;
        let effects = self.lift(&mut booking, BookingAction::Close, env);
        if let Some(checkout_id) = booking.checkout.as_ref().map(|session| session.id) {
            tracing::info!(
                event_id = %event.id,
                %checkout_id,
                "Left page with checkout in progress"
            );
            state.detached.push(booking);
        }
        effects
    }

    fn loaded(&self, state: &mut DetailsState, event: Event, env: &DetailsEnvironment) -> Effects {
        match &mut state.page {
            DetailsPage::Loading { event_id } if *event_id == event.id => {
                tracing::info!(event_id = %event.id, extras = event.extras.len(), "Event loaded");
                state.page = DetailsPage::Ready(Box::new(EventDetails::new(event)));
                SmallVec::new()
            },
            DetailsPage::Ready(details) if details.event.id == event.id => {
                tracing::info!(event_id = %event.id, "Event reloaded");
                let context = BookingContext::from_event(&event);
                details.event = event;
                self.lift(&mut details.booking, BookingAction::ReplaceContext(context), env)
            },
            _ => {
                tracing::warn!(event_id = %event.id, "Discarded load result for another event");
                SmallVec::new()
            },
        }
    }

    fn is_loading(state: &DetailsState, id: &EventId) -> bool {
        matches!(&state.page, DetailsPage::Loading { event_id } if event_id == id)
    }
}

impl Reducer for DetailsReducer {
    type State = DetailsState;
    type Action = DetailsAction;
    type Environment = DetailsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DetailsAction::Load(event_id) => {
                // A reload keeps the page and the open booking flow
                if state.event_id() == Some(&event_id) && state.ready().is_some() {
                    tracing::debug!(%event_id, "Refetching event");
                    return smallvec![Self::fetch(env, event_id)];
                }

                let mut effects = self.leave(state, env);
                state.page = DetailsPage::Loading {
                    event_id: event_id.clone(),
                };
                tracing::debug!(%event_id, "Fetching event");
                effects.push(Self::fetch(env, event_id));
                effects
            },

            DetailsAction::Loaded(event) => self.loaded(state, *event, env),

            DetailsAction::NotFound(event_id) => {
                if Self::is_loading(state, &event_id) {
                    tracing::warn!(%event_id, "Event not found");
                    state.page = DetailsPage::NotFound { event_id };
                } else {
                    tracing::debug!(%event_id, "Ignored not-found for a settled page");
                }
                SmallVec::new()
            },

            DetailsAction::LoadFailed { event_id, message } => {
                if Self::is_loading(state, &event_id) {
                    tracing::error!(%event_id, %message, "Event fetch failed");
                    state.page = DetailsPage::Failed { event_id, message };
                } else {
                    tracing::warn!(%event_id, %message, "Ignored fetch failure for a settled page");
                }
                SmallVec::new()
            },

            DetailsAction::OpenBooking => self.delegate(state, BookingAction::Open, env),
            DetailsAction::Booking(action) => self.delegate(state, action, env),
        }
    }
}
