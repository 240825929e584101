//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::booking::BookingConfig;
use crate::payment::CheckoutConfig;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Error raised for a malformed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A flag holds something other than a boolean
    #[error("{name} must be a boolean (true/false/1/0/yes/no/on/off), got {value:?}")]
    InvalidBool {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Merchant settings sent with every checkout
    pub checkout: CheckoutConfig,
    /// Whether the hosted checkout widget loaded
    pub checkout_available: bool,
    /// Booking rules
    pub booking: BookingConfig,
    /// Optional JSON file with events to seed the store with
    pub events_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checkout: CheckoutConfig::default(),
            checkout_available: true,
            booking: BookingConfig::default(),
            events_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TICKETBOOTH_CHECKOUT_KEY` | empty |
    /// | `TICKETBOOTH_MERCHANT_NAME` | `Event Booking` |
    /// | `TICKETBOOTH_CHECKOUT_THEME` | `#7c3aed` |
    /// | `TICKETBOOTH_CHECKOUT_AVAILABLE` | `true` |
    /// | `TICKETBOOTH_ALLOW_FREE_BOOKINGS` | `false` |
    /// | `TICKETBOOTH_EVENTS_FILE` | unset |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a flag is not a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a flag is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            checkout: CheckoutConfig {
                key: var("TICKETBOOTH_CHECKOUT_KEY").unwrap_or(defaults.checkout.key),
                merchant_name: var("TICKETBOOTH_MERCHANT_NAME")
                    .unwrap_or(defaults.checkout.merchant_name),
                theme_color: var("TICKETBOOTH_CHECKOUT_THEME")
                    .unwrap_or(defaults.checkout.theme_color),
            },
            checkout_available: parse_flag(
                "TICKETBOOTH_CHECKOUT_AVAILABLE",
                var("TICKETBOOTH_CHECKOUT_AVAILABLE"),
                defaults.checkout_available,
            )?,
            booking: BookingConfig {
                allow_free_bookings: parse_flag(
                    "TICKETBOOTH_ALLOW_FREE_BOOKINGS",
                    var("TICKETBOOTH_ALLOW_FREE_BOOKINGS"),
                    defaults.booking.allow_free_bookings,
                )?,
            },
            events_file: var("TICKETBOOTH_EVENTS_FILE").map(PathBuf::from),
        })
    }
}

fn parse_flag(
    name: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name, value }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.checkout.merchant_name, "Event Booking");
        assert_eq!(config.checkout.theme_color, "#7c3aed");
        assert!(config.checkout_available);
        assert!(!config.booking.allow_free_bookings);
    }

    #[test]
    fn values_override_defaults() {
        let config = load(&[
            ("TICKETBOOTH_CHECKOUT_KEY", "rzp_test_123"),
            ("TICKETBOOTH_MERCHANT_NAME", "Holi Nights"),
            ("TICKETBOOTH_ALLOW_FREE_BOOKINGS", "Yes"),
            ("TICKETBOOTH_CHECKOUT_AVAILABLE", "0"),
            ("TICKETBOOTH_EVENTS_FILE", "events.json"),
        ])
        .unwrap();

        assert_eq!(config.checkout.key, "rzp_test_123");
        assert_eq!(config.checkout.merchant_name, "Holi Nights");
        assert!(config.booking.allow_free_bookings);
        assert!(!config.checkout_available);
        assert_eq!(config.events_file, Some(PathBuf::from("events.json")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("TICKETBOOTH_MERCHANT_NAME", "  ")]).unwrap();
        assert_eq!(config.checkout.merchant_name, "Event Booking");
    }

    #[test]
    fn malformed_flag_is_an_error() {
        let err = load(&[("TICKETBOOTH_ALLOW_FREE_BOOKINGS", "maybe")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                name: "TICKETBOOTH_ALLOW_FREE_BOOKINGS",
                value: "maybe".to_string(),
            }
        );
    }
}
