//! Booking flow demo.
//!
//! Loads one event and walks its booking flow end to end against a simulated
//! checkout: open, pick the first extra, two tickets, review, confirm.
//!
//! ```text
//! ticketbooth [event-id]
//! ```

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use ticketbooth_booking::{
    BookingAction, BookingEnvironment, BookingState, BookingStep, Config, DetailsAction,
    DetailsEnvironment, DetailsReducer, DetailsState, Event, EventId, Extra, ExtraCategory,
    metrics::register_booking_metrics,
    payment::{CheckoutProvider, PaymentBridge, SimulatedCheckout, UnavailableCheckout},
    repository::{EventRepository, InMemoryEventRepository},
    shell::{PageScrollLock, TracingNavigator, TracingNotifier},
};
use ticketbooth_core::environment::SystemClock;
use ticketbooth_runtime::Store;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type DetailsStore = Store<DetailsState, DetailsAction, DetailsEnvironment, DetailsReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ticketbooth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        merchant = %config.checkout.merchant_name,
        checkout_available = config.checkout_available,
        allow_free_bookings = config.booking.allow_free_bookings,
        "Configuration loaded"
    );
    register_booking_metrics();

    let repository = InMemoryEventRepository::new(Arc::new(SystemClock));
    let default_event = match &config.events_file {
        Some(path) => {
            repository
                .load_json(path)
                .await
                .with_context(|| format!("failed to seed events from {}", path.display()))?;
            repository
                .list()
                .await?
                .into_iter()
                .next()
                .map(|event| event.id)
        },
        None => Some(repository.insert(sample_event()).await?.id),
    };

    let event_id = std::env::args()
        .nth(1)
        .map(EventId::new)
        .or(default_event)
        .context("no event to book: the events file is empty")?;

    let provider: Arc<dyn CheckoutProvider> = if config.checkout_available {
        Arc::new(SimulatedCheckout::new(Duration::from_millis(250)))
    } else {
        Arc::new(UnavailableCheckout)
    };
    let environment = DetailsEnvironment::new(
        Arc::new(repository),
        BookingEnvironment::new(
            Arc::new(TracingNotifier),
            Arc::new(TracingNavigator),
            Arc::new(PageScrollLock::new()),
            PaymentBridge::new(provider, config.checkout.clone()),
            config.booking,
        ),
    );
    let store = Store::new(DetailsState::default(), DetailsReducer::new(), environment);

    send(&store, DetailsAction::Load(event_id.clone())).await?;
    let Some(details) = store.state(|state| state.ready().cloned()).await else {
        let page = store.state(|state| state.page.clone()).await;
        println!("Event {event_id} is not available: {page:?}");
        return Ok(());
    };

    println!("{} [{}]", details.event.title, details.status_badge());
    println!("  {}", details.price_label());
    if let Some(date) = details.date_label() {
        println!("  {date}");
    }
    if let Some(schedule) = details.schedule_label() {
        println!("  {schedule}");
    }
    let preview = details.extras_preview();
    if !preview.names.is_empty() {
        println!("  Extras: {}", preview.names.join(", "));
        if let Some(more) = preview.more_label() {
            println!("  {more}");
        }
    }
    for (category, items) in details.booking.context.extras.groups() {
        println!("  {}", category.label());
        for item in items {
            println!("    {} ({})", item.extra.name, item.price().price_label());
        }
    }
    println!("  [{}]", details.desktop_cta());

    send(&store, DetailsAction::OpenBooking).await?;
    print_step(&store).await;

    send(&store, DetailsAction::Booking(BookingAction::Next)).await?;
    print_step(&store).await;

    if let Some(first) = details.booking.context.extras.items().first() {
        let toggle = BookingAction::ToggleExtra(first.key.clone());
        send(&store, DetailsAction::Booking(toggle)).await?;
        println!("  + {} ({})", first.extra.name, first.price().price_label());
    }
    send(&store, DetailsAction::Booking(BookingAction::SetQuantity(2))).await?;
    print_step(&store).await;

    let on_summary = store
        .state(|state| state.booking().and_then(BookingState::step))
        .await
        == Some(BookingStep::Summary);
    if !on_summary {
        send(&store, DetailsAction::Booking(BookingAction::Next)).await?;
        print_step(&store).await;
    }

    send(&store, DetailsAction::Booking(BookingAction::Confirm)).await?;

    let outcome = store
        .state(|state| {
            state
                .booking()
                .map(|booking| (booking.last_outcome.clone(), booking.is_open()))
        })
        .await;
    match outcome {
        Some((Some(outcome), _)) => println!("Outcome: {outcome:?}"),
        Some((None, true)) => println!("Booking is still open: confirmation was rejected"),
        _ => println!("Booking ended without an outcome"),
    }

    store
        .shutdown(Duration::from_secs(5))
        .await
        .context("effects still running at shutdown")?;
    Ok(())
}

/// Sends an action and waits for every effect it caused
async fn send(store: &DetailsStore, action: DetailsAction) -> anyhow::Result<()> {
    let mut handle = store.send(action).await?;
    handle.wait().await;
    Ok(())
}

async fn print_step(store: &DetailsStore) {
    let view = store
        .state(|state| {
            let booking = state.booking()?;
            Some((
                booking.step()?,
                booking.progress()?,
                booking.price()?,
                booking.next_label()?,
            ))
        })
        .await;

    if let Some((step, (position, total), price, next)) = view {
        println!("[{position}/{total}] {}", step.title());
        println!(
            "  {} × {} = {}",
            price.tickets_label(),
            price.per_ticket,
            price.total
        );
        if let Some(includes) = price.includes_label() {
            println!("  {includes}");
        }
        println!("  [{next}]");
    }
}

/// The event used when no events file is configured
fn sample_event() -> Event {
    Event::new(
        EventId::new("sample"),
        "Holi Music Night",
        "https://images.example/holi-night.jpg",
    )
    .with_price("Free")
    .with_extra(
        Extra::new(ExtraCategory::Music, "DJ Night")
            .with_price("₹200")
            .with_description("Three-hour DJ set on the main stage"),
    )
}
