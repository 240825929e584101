//! Event store access.
//!
//! The booking flow only reads events. Writes exist for seeding and for the
//! admin side, which owns id assignment and timestamps.

use crate::error::RepositoryError;
use crate::types::{Event, EventId, ExtraId};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use ticketbooth_core::environment::Clock;
use tokio::sync::RwLock;

/// Read access to published events
pub trait EventRepository: Send + Sync {
    /// One-shot fetch by id; `Ok(None)` when no event has the id
    fn fetch(&self, id: &EventId) -> BoxFuture<'static, Result<Option<Event>, RepositoryError>>;

    /// All events, by date then start time, undated last
    fn list(&self) -> BoxFuture<'static, Result<Vec<Event>, RepositoryError>>;
}

/// Sorts events for listing pages
pub fn sort_for_listing(events: &mut [Event]) {
    events.sort_by(|a, b| {
        let key = |e: &Event| {
            (
                e.event_date.is_none(),
                e.event_date,
                e.start_time.is_none(),
                e.start_time,
            )
        };
        key(a).cmp(&key(b)).then_with(|| a.title.cmp(&b.title))
    });
}

/// In-memory event store
#[derive(Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<EventId, Event>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryEventRepository {
    /// Creates an empty store stamping records with `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Publishes a new event
    ///
    /// Assigns a fresh event id, gives id-less extras a generated id and
    /// stamps both timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] if the title or image is missing.
    pub async fn insert(&self, mut event: Event) -> Result<Event, RepositoryError> {
        event.validate()?;

        let now = self.clock.now();
        event.id = EventId::generate();
        event.created_at = Some(now);
        event.updated_at = Some(now);
        for extra in &mut event.extras {
            extra.id.get_or_insert_with(ExtraId::generate);
        }

        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        tracing::info!(event_id = %event.id, title = %event.title, "Event created");
        Ok(event)
    }

    /// Replaces an existing event, refreshing `updatedAt`
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] for an unknown id and
    /// [`RepositoryError::Invalid`] if required fields are missing.
    pub async fn update(&self, mut event: Event) -> Result<Event, RepositoryError> {
        event.validate()?;

        let mut events = self.events.write().await;
        let Some(stored) = events.get(&event.id) else {
            return Err(RepositoryError::NotFound(event.id));
        };

        event.created_at = stored.created_at;
        event.updated_at = Some(self.clock.now());
        for extra in &mut event.extras {
            extra.id.get_or_insert_with(ExtraId::generate);
        }

        events.insert(event.id.clone(), event.clone());
        tracing::info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Stores events as they are, keeping their ids and timestamps
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] on the first invalid event;
    /// nothing is stored in that case.
    pub async fn seed(&self, seeded: Vec<Event>) -> Result<usize, RepositoryError> {
        for event in &seeded {
            event.validate()?;
        }

        let count = seeded.len();
        let mut events = self.events.write().await;
        for event in seeded {
            events.insert(event.id.clone(), event);
        }
        Ok(count)
    }

    /// Seeds events from a JSON array file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// events, or holds an invalid event.
    pub async fn load_json(&self, path: impl AsRef<Path>) -> Result<usize, RepositoryError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let events: Vec<Event> = serde_json::from_str(&raw)?;
        let count = self.seed(events).await?;
        tracing::info!(path = %path.display(), count, "Events loaded");
        Ok(count)
    }
}

impl EventRepository for InMemoryEventRepository {
    fn fetch(&self, id: &EventId) -> BoxFuture<'static, Result<Option<Event>, RepositoryError>> {
        let events = Arc::clone(&self.events);
        let id = id.clone();
        Box::pin(async move {
            let event = events.read().await.get(&id).cloned();
            tracing::debug!(event_id = %id, found = event.is_some(), "Event fetched");
            Ok(event)
        })
    }

    fn list(&self) -> BoxFuture<'static, Result<Vec<Event>, RepositoryError>> {
        let events = Arc::clone(&self.events);
        Box::pin(async move {
            let mut listed: Vec<Event> = events.read().await.values().cloned().collect();
            sort_for_listing(&mut listed);
            Ok(listed)
        })
    }
}
