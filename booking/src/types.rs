//! Domain types for event listings and their add-ons.
//!
//! The serialized shape matches the stored event documents: camelCase field
//! names, `type` for the category label and `imageURL` on extras. Decoding is
//! lenient where the stored data is: prices may be numbers or text, legacy
//! extra ids are numeric timestamps, and blank strings mean "not set".

use crate::time::TimeOfDay;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier assigned to an event by the store
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wraps an identifier handed out by the event store
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication status of an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Announced, not yet running
    #[default]
    Upcoming,
    /// Happening now
    Live,
}

impl EventStatus {
    /// Badge text shown next to the title
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Live => "Live Now",
        }
    }
}

/// Identity of an extra within its event
///
/// Extras authored before random ids existed carry numeric timestamp ids;
/// both forms decode into the same text key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "raw::LooseText", into = "String")]
pub struct ExtraId(String);

impl ExtraId {
    /// Wraps an existing id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a new random id, independent of wall-clock time
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<raw::LooseText> for ExtraId {
    fn from(value: raw::LooseText) -> Self {
        Self(value.into_string())
    }
}

impl From<ExtraId> for String {
    fn from(value: ExtraId) -> Self {
        value.0
    }
}

impl fmt::Display for ExtraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category of an extra; the declaration order is the display order
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExtraCategory {
    /// Games and activities
    Game,
    /// Food and drinks
    Food,
    /// Music and DJ sets
    Music,
    /// Anything else, including unknown categories
    #[default]
    #[serde(other)]
    Other,
}

impl ExtraCategory {
    /// Section heading for the category
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Game => "🎮 Games & Activities",
            Self::Food => "🍽️ Food & Drinks",
            Self::Music => "🎵 Music & DJ",
            Self::Other => "✨ Other Extras",
        }
    }
}

/// An optional add-on sold per ticket
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    /// Identity within the owning event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExtraId>,
    /// Category (unknown or missing decodes as `Other`)
    #[serde(default, deserialize_with = "raw::category")]
    pub category: ExtraCategory,
    /// Display name, may be blank while being authored
    #[serde(default)]
    pub name: String,
    /// Longer description
    #[serde(default, deserialize_with = "raw::optional_text")]
    pub description: Option<String>,
    /// Price text, same grammar as the event price
    #[serde(default, deserialize_with = "raw::optional_text")]
    pub price: Option<String>,
    /// Image shown on the extra's card
    #[serde(
        default,
        rename = "imageURL",
        deserialize_with = "raw::optional_text"
    )]
    pub image_url: Option<String>,
}

impl Extra {
    /// Creates an extra with a freshly generated id
    #[must_use]
    pub fn new(category: ExtraCategory, name: impl Into<String>) -> Self {
        Self {
            id: Some(ExtraId::generate()),
            category,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the price text
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Why an event record cannot be published
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// Title is empty or whitespace
    #[error("Event title is required")]
    MissingTitle,
    /// Main image URL is empty
    #[error("Event image URL is required")]
    MissingImage,
}

/// A published event listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Identifier assigned by the store
    pub id: EventId,
    /// Display title
    pub title: String,
    /// Free-text category label
    #[serde(
        default,
        rename = "type",
        deserialize_with = "raw::optional_text"
    )]
    pub event_type: Option<String>,
    /// Per-ticket price text ("Free", "1500", "₹15,000")
    #[serde(default, deserialize_with = "raw::optional_text")]
    pub price: Option<String>,
    /// Publication status
    #[serde(default)]
    pub status: EventStatus,
    /// Calendar date
    #[serde(default, deserialize_with = "raw::optional_date")]
    pub event_date: Option<NaiveDate>,
    /// Start time
    #[serde(default, deserialize_with = "raw::optional_time")]
    pub start_time: Option<TimeOfDay>,
    /// End time
    #[serde(default, deserialize_with = "raw::optional_time")]
    pub end_time: Option<TimeOfDay>,
    /// Venue
    #[serde(default, deserialize_with = "raw::optional_text")]
    pub location: Option<String>,
    /// Contact number
    #[serde(default, deserialize_with = "raw::optional_text")]
    pub phone: Option<String>,
    /// Long description
    #[serde(default, deserialize_with = "raw::optional_text")]
    pub description: Option<String>,
    /// Hero image URL
    #[serde(default)]
    pub main_image: String,
    /// Add-ons in display order
    #[serde(default, deserialize_with = "raw::extras")]
    pub extras: Vec<Extra>,
    /// When the listing was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the listing was last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Creates an upcoming event with the two required fields set
    #[must_use]
    pub fn new(id: EventId, title: impl Into<String>, main_image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            event_type: None,
            price: None,
            status: EventStatus::Upcoming,
            event_date: None,
            start_time: None,
            end_time: None,
            location: None,
            phone: None,
            description: None,
            main_image: main_image.into(),
            extras: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the price text
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Appends an extra
    #[must_use]
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extras.push(extra);
        self
    }

    /// Sets the status
    #[must_use]
    pub const fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Checks the fields required to publish an event
    ///
    /// # Errors
    ///
    /// Returns the first missing required field.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::MissingTitle);
        }
        if self.main_image.trim().is_empty() {
            return Err(EventValidationError::MissingImage);
        }
        Ok(())
    }

    /// "8:30 AM – 11:00 PM", only the start when there is no end, or `None`
    #[must_use]
    pub fn schedule_label(&self) -> Option<String> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(format!("{} – {}", start.to_12h(), end.to_12h())),
            (Some(start), None) => Some(start.to_12h()),
            (None, Some(end)) => Some(end.to_12h()),
            (None, None) => None,
        }
    }

    /// "Sat, 15 March 2025"
    #[must_use]
    pub fn date_label(&self) -> Option<String> {
        self.event_date
            .map(|date| date.format("%a, %-d %B %Y").to_string())
    }
}

/// Lenient decoders for stored event documents.
mod raw {
    use super::{Extra, ExtraCategory, NaiveDate, TimeOfDay};
    use serde::{Deserialize, Deserializer};

    /// Text that may have been stored as a number
    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum LooseText {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    impl LooseText {
        pub(super) fn into_string(self) -> String {
            match self {
                Self::Text(text) => text,
                Self::Integer(value) => value.to_string(),
                Self::Float(value) => value.to_string(),
            }
        }
    }

    fn blank_to_none(text: Option<String>) -> Option<String> {
        text.filter(|t| !t.trim().is_empty())
    }

    pub(super) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<LooseText>::deserialize(deserializer)?;
        Ok(blank_to_none(value.map(LooseText::into_string)))
    }

    pub(super) fn optional_time<'de, D>(deserializer: D) -> Result<Option<TimeOfDay>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = blank_to_none(Option::<String>::deserialize(deserializer)?) else {
            return Ok(None);
        };
        TimeOfDay::parse_24h(&text)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }

    pub(super) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = blank_to_none(Option::<String>::deserialize(deserializer)?) else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }

    pub(super) fn category<'de, D>(deserializer: D) -> Result<ExtraCategory, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<ExtraCategory>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub(super) fn extras<'de, D>(deserializer: D) -> Result<Vec<Extra>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<Extra>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
