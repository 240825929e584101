//! End-to-end booking flows through a running `Store`.
//!
//! Each test wires the reducers to recording collaborators, drives the flow
//! the way the page would, waits for every effect and then checks what the
//! visitor saw: toasts, navigation, scroll lock and checkout requests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;
use ticketbooth_booking::booking::{
    BookingOutcome, CheckoutId, FREE_BOOKING_MESSAGE, PAYMENT_CANCELLED_MESSAGE,
    PAYMENT_IN_PROGRESS_MESSAGE, PAYMENT_SUCCESS_MESSAGE,
};
use ticketbooth_booking::extras::ExtraKey;
use ticketbooth_booking::mocks::{ScriptedCheckout, TestCollaborators};
use ticketbooth_booking::payment::Currency;
use ticketbooth_booking::repository::InMemoryEventRepository;
use ticketbooth_booking::shell::{NotificationLevel, Route};
use ticketbooth_booking::{
    BookingAction, BookingConfig, BookingContext, BookingEnvironment, BookingReducer, BookingState,
    BookingStep, DetailsAction, DetailsEnvironment, DetailsPage, DetailsReducer, DetailsState,
    Event, EventId, Extra, ExtraCategory, Rupees,
};
use ticketbooth_runtime::Store;
use ticketbooth_testing::test_clock;

type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

fn holi_night() -> Event {
    Event::new(EventId::new("holi"), "Holi Music Night", "https://img.example/holi.jpg")
        .with_price("Free")
        .with_extra(Extra::new(ExtraCategory::Music, "DJ Night").with_price("₹200"))
}

fn stand_up(price: &str) -> Event {
    Event::new(EventId::new("comedy"), "Stand-up Night", "https://img.example/comedy.jpg")
        .with_price(price)
}

fn booking_store(event: &Event, mocks: &TestCollaborators, config: BookingConfig) -> BookingStore {
    Store::new(
        BookingState::new(BookingContext::from_event(event)),
        BookingReducer::new(),
        mocks.environment(config),
    )
}

async fn send(store: &BookingStore, action: BookingAction) {
    store.send(action).await.unwrap().wait().await;
}

async fn first_extra_key(store: &BookingStore) -> ExtraKey {
    store
        .state(|state| state.context.extras.items()[0].key.clone())
        .await
}

// ========== Paid checkout ==========

#[tokio::test]
async fn free_event_with_paid_extra_charges_extras_only() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("pay_holi_1"));
    let store = booking_store(&holi_night(), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    assert!(mocks.scroll_lock.is_locked());

    send(&store, BookingAction::Next).await;
    assert_eq!(store.state(BookingState::step).await, Some(BookingStep::Extras));

    let dj = first_extra_key(&store).await;
    send(&store, BookingAction::ToggleExtra(dj)).await;
    send(&store, BookingAction::SetQuantity(2)).await;
    send(&store, BookingAction::Next).await;

    let price = store.state(BookingState::price).await.unwrap();
    assert_eq!(store.state(BookingState::step).await, Some(BookingStep::Summary));
    assert_eq!(price.per_ticket, Rupees::new(200));
    assert_eq!(price.total, Rupees::new(400));

    send(&store, BookingAction::Confirm).await;

    let requests = mocks.checkout.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount_minor_units, 40_000);
    assert_eq!(requests[0].currency, Currency::Inr);
    assert_eq!(requests[0].description, "Holi Music Night");

    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Success),
        [PAYMENT_SUCCESS_MESSAGE]
    );
    assert_eq!(mocks.navigator.routes(), [Route::Home]);
    assert!(!mocks.scroll_lock.is_locked());

    let state = store.state(BookingState::clone).await;
    assert!(!state.is_open());
    assert!(state.checkout.is_none());
    assert_eq!(
        state.last_outcome,
        Some(BookingOutcome::Paid {
            reference: "pay_holi_1".to_string(),
            amount: Rupees::new(400),
        })
    );
}

#[tokio::test]
async fn event_without_extras_goes_straight_to_summary() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("pay_comedy"));
    let store = booking_store(&stand_up("₹499"), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::IncrementQuantity).await;
    send(&store, BookingAction::Next).await;

    assert_eq!(store.state(BookingState::step).await, Some(BookingStep::Summary));
    assert_eq!(store.state(BookingState::progress).await, Some((2, 2)));

    send(&store, BookingAction::Confirm).await;
    assert_eq!(mocks.checkout.requests()[0].amount_minor_units, 99_800);
}

// ========== Rejected confirmations ==========

#[tokio::test]
async fn zero_total_never_opens_checkout() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("unused"));
    let store = booking_store(&holi_night(), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;
    send(&store, BookingAction::Next).await;
    send(&store, BookingAction::Confirm).await;

    assert_eq!(mocks.checkout.open_calls(), 0);
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Error),
        ["Invalid amount"]
    );
    assert_eq!(mocks.notifier.notifications().len(), 1);
    assert!(store.state(BookingState::is_open).await);
    assert!(mocks.scroll_lock.is_locked());
}

#[tokio::test]
async fn missing_widget_reports_gateway_failure() {
    let mocks = TestCollaborators::new(ScriptedCheckout::unavailable());
    let store = booking_store(&stand_up("300"), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;
    send(&store, BookingAction::Confirm).await;

    assert_eq!(mocks.checkout.open_calls(), 0);
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Error),
        ["Payment gateway failed to load"]
    );
    assert!(store.state(BookingState::is_open).await);
}

#[tokio::test]
async fn free_booking_confirms_when_allowed() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("unused"));
    let store = booking_store(
        &stand_up("Free"),
        &mocks,
        BookingConfig {
            allow_free_bookings: true,
        },
    );

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;
    send(&store, BookingAction::Confirm).await;

    assert_eq!(mocks.checkout.open_calls(), 0);
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Success),
        [FREE_BOOKING_MESSAGE]
    );
    assert_eq!(mocks.navigator.routes(), [Route::Home]);
    assert!(!mocks.scroll_lock.is_locked());
    assert_eq!(
        store.state(|state| state.last_outcome.clone()).await,
        Some(BookingOutcome::ConfirmedFree)
    );
}

// ========== Dismissal and cancellation ==========

#[tokio::test]
async fn dismissed_checkout_cancels_the_flow() {
    let mocks = TestCollaborators::new(ScriptedCheckout::dismissing());
    let store = booking_store(&stand_up("250"), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;
    send(&store, BookingAction::Confirm).await;

    assert_eq!(mocks.checkout.open_calls(), 1);
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Info),
        [PAYMENT_CANCELLED_MESSAGE]
    );
    assert!(mocks.notifier.messages(NotificationLevel::Error).is_empty());
    assert!(mocks.navigator.routes().is_empty());
    assert!(!mocks.scroll_lock.is_locked());

    let state = store.state(BookingState::clone).await;
    assert!(!state.is_open());
    assert_eq!(state.last_outcome, Some(BookingOutcome::Cancelled));
}

#[tokio::test]
async fn cancelling_discards_every_choice() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("unused"));
    let store = booking_store(&holi_night(), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::SetQuantity(6)).await;
    send(&store, BookingAction::Next).await;
    let dj = first_extra_key(&store).await;
    send(&store, BookingAction::ToggleExtra(dj)).await;
    send(&store, BookingAction::Close).await;

    assert!(!store.state(BookingState::is_open).await);
    assert!(!mocks.scroll_lock.is_locked());

    send(&store, BookingAction::Open).await;
    let price = store.state(BookingState::price).await.unwrap();
    assert_eq!(price.quantity, 1);
    assert_eq!(price.selected_count, 0);
    assert_eq!(store.state(BookingState::step).await, Some(BookingStep::Tickets));
    assert!(mocks.notifier.notifications().is_empty());
}

// ========== Late outcomes ==========

#[tokio::test]
async fn outcome_after_close_still_resolves_checkout() {
    let mocks = TestCollaborators::new(
        ScriptedCheckout::succeeding("pay_late").with_delay(Duration::from_millis(30)),
    );
    let store = booking_store(&stand_up("100"), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;

    let mut confirm = store.send(BookingAction::Confirm).await.unwrap();
    send(&store, BookingAction::Close).await;
    assert!(store.state(BookingState::is_awaiting_payment).await);

    confirm.wait().await;

    let state = store.state(BookingState::clone).await;
    assert!(state.checkout.is_none());
    assert_eq!(
        state.last_outcome,
        Some(BookingOutcome::Paid {
            reference: "pay_late".to_string(),
            amount: Rupees::new(100),
        })
    );
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Success),
        [PAYMENT_SUCCESS_MESSAGE]
    );
    assert!(!mocks.scroll_lock.is_locked());
}

#[tokio::test]
async fn reopening_during_checkout_tells_the_visitor() {
    let mocks = TestCollaborators::new(
        ScriptedCheckout::succeeding("pay_slow").with_delay(Duration::from_millis(30)),
    );
    let store = booking_store(&stand_up("100"), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;
    let mut confirm = store.send(BookingAction::Confirm).await.unwrap();
    send(&store, BookingAction::Close).await;
    send(&store, BookingAction::Open).await;

    assert!(!store.state(BookingState::is_open).await);
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Info),
        [PAYMENT_IN_PROGRESS_MESSAGE]
    );
    assert_eq!(mocks.scroll_lock.lock_calls(), 1);

    confirm.wait().await;
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Success),
        [PAYMENT_SUCCESS_MESSAGE]
    );
}

#[tokio::test]
async fn unknown_checkout_outcome_changes_nothing() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("pay_once"));
    let store = booking_store(&stand_up("100"), &mocks, BookingConfig::default());

    send(&store, BookingAction::Open).await;
    send(&store, BookingAction::Next).await;
    send(&store, BookingAction::Confirm).await;
    let before = store.state(BookingState::clone).await;

    send(
        &store,
        BookingAction::CheckoutSucceeded {
            checkout_id: CheckoutId::new(),
            payment_reference: "pay_forged".to_string(),
        },
    )
    .await;

    assert_eq!(store.state(BookingState::clone).await, before);
    assert_eq!(mocks.notifier.notifications().len(), 1);
    assert_eq!(mocks.navigator.routes(), [Route::Home]);
    assert!(!mocks.scroll_lock.is_locked());
}

// ========== Details page ==========

async fn details_store(
    events: Vec<Event>,
    mocks: &TestCollaborators,
) -> Store<DetailsState, DetailsAction, DetailsEnvironment, DetailsReducer> {
    let repository = InMemoryEventRepository::new(Arc::new(test_clock()));
    repository.seed(events).await.unwrap();
    Store::new(
        DetailsState::default(),
        DetailsReducer::new(),
        DetailsEnvironment::new(
            Arc::new(repository),
            mocks.environment(BookingConfig::default()),
        ),
    )
}

#[tokio::test]
async fn details_page_books_a_loaded_event() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("pay_page"));
    let store = details_store(vec![holi_night()], &mocks).await;

    store
        .send(DetailsAction::Load(EventId::new("holi")))
        .await
        .unwrap()
        .wait()
        .await;
    let details = store.state(|state| state.ready().cloned()).await.unwrap();
    assert_eq!(details.price_label(), "Free");
    assert_eq!(details.extras_preview().names, ["DJ Night"]);

    for action in [
        DetailsAction::OpenBooking,
        DetailsAction::Booking(BookingAction::Next),
    ] {
        store.send(action).await.unwrap().wait().await;
    }
    let dj = details.booking.context.extras.items()[0].key.clone();
    for action in [
        BookingAction::ToggleExtra(dj),
        BookingAction::Next,
        BookingAction::Confirm,
    ] {
        store
            .send(DetailsAction::Booking(action))
            .await
            .unwrap()
            .wait()
            .await;
    }

    assert_eq!(mocks.checkout.requests()[0].amount_minor_units, 20_000);
    let booking = store.state(|state| state.booking().cloned()).await.unwrap();
    assert!(!booking.is_open());
    assert!(matches!(booking.last_outcome, Some(BookingOutcome::Paid { .. })));
}

#[tokio::test]
async fn unknown_event_shows_not_found() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("unused"));
    let store = details_store(vec![holi_night()], &mocks).await;

    store
        .send(DetailsAction::Load(EventId::new("missing")))
        .await
        .unwrap()
        .wait()
        .await;
    store.send(DetailsAction::OpenBooking).await.unwrap().wait().await;

    let page = store.state(|state| state.page.clone()).await;
    assert_eq!(
        page,
        DetailsPage::NotFound {
            event_id: EventId::new("missing"),
        }
    );
    assert_eq!(mocks.scroll_lock.lock_calls(), 0);
}

#[tokio::test]
async fn switching_events_releases_the_scroll_lock() {
    let mocks = TestCollaborators::new(ScriptedCheckout::succeeding("unused"));
    let store = details_store(vec![stand_up("100"), holi_night()], &mocks).await;

    for action in [
        DetailsAction::Load(EventId::new("comedy")),
        DetailsAction::OpenBooking,
        DetailsAction::Load(EventId::new("holi")),
    ] {
        store.send(action).await.unwrap().wait().await;
    }

    assert!(!mocks.scroll_lock.is_locked());
    assert_eq!(mocks.scroll_lock.release_calls(), 1);
    let details = store.state(|state| state.ready().cloned()).await.unwrap();
    assert_eq!(details.event.id, EventId::new("holi"));
    assert!(!details.booking_in_progress());
    assert!(store.state(|state| state.detached.is_empty()).await);
}

#[tokio::test]
async fn payment_captured_after_leaving_the_page_still_completes() {
    let mocks = TestCollaborators::new(
        ScriptedCheckout::succeeding("pay_away").with_delay(Duration::from_millis(50)),
    );
    let store = details_store(vec![stand_up("100"), holi_night()], &mocks).await;

    for action in [
        DetailsAction::Load(EventId::new("comedy")),
        DetailsAction::OpenBooking,
        DetailsAction::Booking(BookingAction::Next),
    ] {
        store.send(action).await.unwrap().wait().await;
    }
    let mut confirm = store
        .send(DetailsAction::Booking(BookingAction::Confirm))
        .await
        .unwrap();
    store
        .send(DetailsAction::Load(EventId::new("holi")))
        .await
        .unwrap()
        .wait()
        .await;
    assert_eq!(store.state(|state| state.detached.len()).await, 1);

    confirm.wait().await;

    assert_eq!(mocks.checkout.open_calls(), 1);
    assert_eq!(
        mocks.notifier.messages(NotificationLevel::Success),
        [PAYMENT_SUCCESS_MESSAGE]
    );
    assert_eq!(mocks.navigator.routes(), [Route::Home]);
    assert!(!mocks.scroll_lock.is_locked());
    assert!(store.state(|state| state.detached.is_empty()).await);
    let page_event = store
        .state(|state| state.ready().map(|details| details.event.id.clone()))
        .await;
    assert_eq!(page_event, Some(EventId::new("holi")));
}
