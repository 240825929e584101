//! State of the booking flow.

use crate::extras::{ExtraKey, ExtrasCatalog};
use crate::money::Rupees;
use crate::pricing::extract_price;
use crate::types::{Event, EventId};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A page of the booking wizard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BookingStep {
    /// Pick the ticket count
    Tickets,
    /// Pick add-ons; only reachable when the event has extras
    Extras,
    /// Review and confirm
    Summary,
}

impl BookingStep {
    /// 1-based position among the steps shown for this event
    #[must_use]
    pub const fn number(self, has_extras: bool) -> u8 {
        match (self, has_extras) {
            (Self::Tickets, _) => 1,
            (Self::Extras, _) | (Self::Summary, false) => 2,
            (Self::Summary, true) => 3,
        }
    }

    /// Number of steps shown for an event
    #[must_use]
    pub const fn total(has_extras: bool) -> u8 {
        if has_extras { 3 } else { 2 }
    }

    /// Heading of the step
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Tickets => "Select Tickets",
            Self::Extras => "Choose Extras 🎪",
            Self::Summary => "Order Summary",
        }
    }

    /// Lowercase name for logs and metric labels
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tickets => "tickets",
            Self::Extras => "extras",
            Self::Summary => "summary",
        }
    }

    /// Label of the secondary button
    #[must_use]
    pub const fn back_label(self) -> &'static str {
        match self {
            Self::Tickets => "← Cancel",
            Self::Extras | Self::Summary => "← Go back",
        }
    }
}

/// Everything the booking flow reads from the event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingContext {
    /// Event being booked
    pub event_id: EventId,
    /// Event title, used as the payment description
    pub title: String,
    /// Event image shown in the checkout overlay
    pub image: Option<String>,
    /// Per-ticket entry price
    pub base_price: Rupees,
    /// Normalized add-ons
    pub extras: ExtrasCatalog,
}

impl BookingContext {
    /// Derives the context from a freshly loaded event
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            image: Some(event.main_image.clone()).filter(|url| !url.is_empty()),
            base_price: extract_price(event.price.as_deref()),
            extras: ExtrasCatalog::from_event(event),
        }
    }

    /// Whether the Extras step is part of the flow
    #[must_use]
    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }
}

/// In-progress selection; never persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingDraft {
    /// Current step
    pub step: BookingStep,
    /// Ticket count, at least 1
    pub quantity: u32,
    /// Keys of selected extras; absent means not selected
    pub selected: BTreeSet<ExtraKey>,
}

impl BookingDraft {
    /// Fresh draft: first step, one ticket, nothing selected
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: BookingStep::Tickets,
            quantity: 1,
            selected: BTreeSet::new(),
        }
    }

    /// Whether the extra with `key` is selected
    #[must_use]
    pub fn is_selected(&self, key: &ExtraKey) -> bool {
        self.selected.contains(key)
    }

    /// Prices derived from the current inputs
    #[must_use]
    pub fn price(&self, context: &BookingContext) -> PriceBreakdown {
        PriceBreakdown::compute(context, self)
    }
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Prices derived from a draft; always recomputed, never stored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Per-ticket entry price
    pub base: Rupees,
    /// Sum of selected extras, per ticket
    pub extras_per_ticket: Rupees,
    /// Base plus extras
    pub per_ticket: Rupees,
    /// Per-ticket price times quantity
    pub total: Rupees,
    /// Number of selected keys
    pub selected_count: usize,
    /// Ticket count the total covers
    pub quantity: u32,
}

impl PriceBreakdown {
    /// Computes the prices of `draft` against `context`
    #[must_use]
    pub fn compute(context: &BookingContext, draft: &BookingDraft) -> Self {
        let extras_per_ticket: Rupees = context
            .extras
            .items()
            .iter()
            .filter(|item| draft.is_selected(&item.key))
            .map(|item| item.price())
            .sum();
        let per_ticket = context.base_price.saturating_add(extras_per_ticket);

        Self {
            base: context.base_price,
            extras_per_ticket,
            per_ticket,
            total: per_ticket.saturating_mul(draft.quantity),
            selected_count: draft.selected.len(),
            quantity: draft.quantity,
        }
    }

    /// "3 tickets", "1 ticket"
    #[must_use]
    pub fn tickets_label(&self) -> String {
        plural(self.quantity as usize, "ticket")
    }

    /// "Includes 2 extras for 3 tickets" when extras are selected
    #[must_use]
    pub fn includes_label(&self) -> Option<String> {
        (self.selected_count > 0).then(|| {
            format!(
                "Includes {} for {}",
                plural(self.selected_count, "extra"),
                self.tickets_label()
            )
        })
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Identity of one checkout attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CheckoutId(Uuid);

impl CheckoutId {
    /// Creates a new random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CheckoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CheckoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A checkout handed to the provider and not yet resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Attempt id, echoed back by the outcome action
    pub id: CheckoutId,
    /// Amount requested
    pub amount: Rupees,
    /// Tickets the amount covers
    pub quantity: u32,
}

/// How the last booking flow ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// Payment captured
    Paid {
        /// Provider payment reference
        reference: String,
        /// Amount charged
        amount: Rupees,
    },
    /// Zero-total booking confirmed without payment
    ConfirmedFree,
    /// Visitor dismissed the checkout
    Cancelled,
}

impl BookingOutcome {
    /// Metric label for the outcome
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Paid { .. } => "paid",
            Self::ConfirmedFree => "confirmed_free",
            Self::Cancelled => "cancelled",
        }
    }
}

/// State of one booking flow for one event
///
/// `draft == None` is the closed flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingState {
    /// Event-derived inputs
    pub context: BookingContext,
    /// Open draft, if the flow is open
    pub draft: Option<BookingDraft>,
    /// Checkout awaiting its outcome
    pub checkout: Option<CheckoutSession>,
    /// Outcome of the last finished flow, in memory only
    pub last_outcome: Option<BookingOutcome>,
}

impl BookingState {
    /// Closed flow for `context`
    #[must_use]
    pub const fn new(context: BookingContext) -> Self {
        Self {
            context,
            draft: None,
            checkout: None,
            last_outcome: None,
        }
    }

    /// Whether a draft is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Current step, if open
    #[must_use]
    pub fn step(&self) -> Option<BookingStep> {
        self.draft.as_ref().map(|draft| draft.step)
    }

    /// Ticket count, if open
    #[must_use]
    pub fn quantity(&self) -> Option<u32> {
        self.draft.as_ref().map(|draft| draft.quantity)
    }

    /// Current prices, if open
    #[must_use]
    pub fn price(&self) -> Option<PriceBreakdown> {
        self.draft.as_ref().map(|draft| draft.price(&self.context))
    }

    /// `(position, total)` for the progress indicator, if open
    #[must_use]
    pub fn progress(&self) -> Option<(u8, u8)> {
        let has_extras = self.context.has_extras();
        self.step()
            .map(|step| (step.number(has_extras), BookingStep::total(has_extras)))
    }

    /// Label of the primary button, if open
    #[must_use]
    pub fn next_label(&self) -> Option<String> {
        let draft = self.draft.as_ref()?;
        let label = match draft.step {
            BookingStep::Tickets if self.context.has_extras() => "Next: Choose Extras →".to_string(),
            BookingStep::Tickets => "Review Order →".to_string(),
            BookingStep::Extras if draft.selected.is_empty() => "Skip & Review →".to_string(),
            BookingStep::Extras => format!("Review ({}) →", plural(draft.selected.len(), "extra")),
            BookingStep::Summary => "✅ Confirm Booking".to_string(),
        };
        Some(label)
    }

    /// Whether a checkout is awaiting its outcome
    #[must_use]
    pub const fn is_awaiting_payment(&self) -> bool {
        self.checkout.is_some()
    }
}
