//! Extras normalization: identity keys and category groups.
//!
//! Selection state is keyed by [`ExtraKey`], so the key of an item must be
//! the same every time the same event is normalized.

use crate::money::Rupees;
use crate::pricing::extract_price;
use crate::types::{Event, Extra, ExtraCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identity of an extra within one event
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraKey(String);

impl ExtraKey {
    /// Wraps a raw key
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for an extra at `index`: id, else non-empty name, else `extra_{index}`
    #[must_use]
    pub fn for_extra(extra: &Extra, index: usize) -> Self {
        if let Some(id) = extra.id.as_ref().filter(|id| !id.as_str().is_empty()) {
            return Self(id.as_str().to_string());
        }
        if !extra.name.is_empty() {
            return Self(extra.name.clone());
        }
        Self(format!("extra_{index}"))
    }

    /// Returns the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtraKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An extra paired with its identity key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedExtra {
    /// Identity key used for selection
    pub key: ExtraKey,
    /// The underlying item
    pub extra: Extra,
}

impl NormalizedExtra {
    /// Per-ticket price of this extra
    #[must_use]
    pub fn price(&self) -> Rupees {
        extract_price(self.extra.price.as_deref())
    }
}

/// Normalized extras of one event, in order and grouped by category
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtrasCatalog {
    items: Vec<NormalizedExtra>,
    groups: BTreeMap<ExtraCategory, Vec<NormalizedExtra>>,
}

impl ExtrasCatalog {
    /// Normalizes a raw extras list
    ///
    /// Two extras with the same id (or the same name and no id) share a key;
    /// selecting one selects both.
    #[must_use]
    pub fn from_extras(extras: &[Extra]) -> Self {
        let items: Vec<NormalizedExtra> = extras
            .iter()
            .enumerate()
            .map(|(index, extra)| NormalizedExtra {
                key: ExtraKey::for_extra(extra, index),
                extra: extra.clone(),
            })
            .collect();

        let mut groups: BTreeMap<ExtraCategory, Vec<NormalizedExtra>> = BTreeMap::new();
        for item in &items {
            groups
                .entry(item.extra.category)
                .or_default()
                .push(item.clone());
        }

        Self { items, groups }
    }

    /// Normalizes the extras of an event
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self::from_extras(&event.extras)
    }

    /// Items in display order
    #[must_use]
    pub fn items(&self) -> &[NormalizedExtra] {
        &self.items
    }

    /// Non-empty category groups in category order
    pub fn groups(&self) -> impl Iterator<Item = (ExtraCategory, &[NormalizedExtra])> {
        self.groups
            .iter()
            .map(|(category, items)| (*category, items.as_slice()))
    }

    /// Items of one category, empty if none
    #[must_use]
    pub fn group(&self, category: ExtraCategory) -> &[NormalizedExtra] {
        match self.groups.get(&category) {
            Some(items) => items,
            None => &[],
        }
    }

    /// First item with the given key
    #[must_use]
    pub fn get(&self, key: &ExtraKey) -> Option<&NormalizedExtra> {
        self.items.iter().find(|item| &item.key == key)
    }

    /// Checks whether any item carries the key
    #[must_use]
    pub fn contains(&self, key: &ExtraKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the event has no extras
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First `limit` names plus how many items were left out
    #[must_use]
    pub fn preview(&self, limit: usize) -> ExtrasPreview {
        ExtrasPreview {
            names: self
                .items
                .iter()
                .take(limit)
                .map(|item| item.extra.name.clone())
                .collect(),
            remaining: self.items.len().saturating_sub(limit),
        }
    }
}

/// A short listing of extras for summary panels
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtrasPreview {
    /// Names of the shown items
    pub names: Vec<String>,
    /// Count of items not shown
    pub remaining: usize,
}

impl ExtrasPreview {
    /// "+N more", or `None` when nothing was left out
    #[must_use]
    pub fn more_label(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("+{} more", self.remaining))
    }
}
