//! Event start/end times.
//!
//! A time is stored once, as a 24-hour `HH:MM` value. The 12-hour form shown
//! to visitors ("8:30 PM") is derived on demand and never stored.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a time string cannot be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {format} time: {input:?}")]
pub struct TimeParseError {
    /// The rejected input
    pub input: String,
    /// Which notation was expected ("24-hour" or "12-hour")
    pub format: &'static str,
}

/// A wall-clock time of day, canonical in 24-hour notation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Builds a time from hour (0-23) and minute (0-59)
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parses 24-hour notation such as `"08:30"` or `"23:00"`
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError`] if the input is not a valid `HH:MM` time.
    pub fn parse_24h(input: &str) -> Result<Self, TimeParseError> {
        NaiveTime::parse_from_str(input.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| TimeParseError {
                input: input.to_string(),
                format: "24-hour",
            })
    }

    /// Parses 12-hour notation such as `"8:30 AM"` or `"12:00 pm"`
    ///
    /// 12 AM is midnight and 12 PM is noon.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError`] if the input is not a valid `h:MM AM/PM` time.
    pub fn parse_12h(input: &str) -> Result<Self, TimeParseError> {
        NaiveTime::parse_from_str(input.trim(), "%I:%M %p")
            .map(Self)
            .map_err(|_| TimeParseError {
                input: input.to_string(),
                format: "12-hour",
            })
    }

    /// 24-hour form used for storage and sorting: `"08:30"`
    #[must_use]
    pub fn to_24h(self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// 12-hour form used for display: `"8:30 AM"`
    #[must_use]
    pub fn to_12h(self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_24h())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_24h(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_24h(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_24h()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn twelve_hour_input_converts_to_canonical_form() {
        assert_eq!(TimeOfDay::parse_12h("8:30 AM").unwrap().to_24h(), "08:30");
        assert_eq!(TimeOfDay::parse_12h("11:00 PM").unwrap().to_24h(), "23:00");
        assert_eq!(TimeOfDay::parse_12h("12:00 AM").unwrap().to_24h(), "00:00");
        assert_eq!(TimeOfDay::parse_12h("12:15 PM").unwrap().to_24h(), "12:15");
    }

    #[test]
    fn display_form_is_derived() {
        let time = TimeOfDay::parse_24h("20:05").unwrap();
        assert_eq!(time.to_12h(), "8:05 PM");
        assert_eq!(TimeOfDay::from_hm(0, 0).unwrap().to_12h(), "12:00 AM");
        assert_eq!(time.to_string(), "20:05");
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(TimeOfDay::parse_24h("24:00").is_err());
        assert!(TimeOfDay::parse_24h("noon").is_err());
        assert!(TimeOfDay::parse_12h("13:00 PM").is_err());

        let error = TimeOfDay::parse_12h("8:30").unwrap_err();
        assert_eq!(error.format, "12-hour");
        assert_eq!(error.to_string(), "invalid 12-hour time: \"8:30\"");
    }

    #[test]
    fn serializes_as_24h_string() {
        let time = TimeOfDay::from_hm(8, 30).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"08:30\"");

        let parsed: TimeOfDay = serde_json::from_str("\"23:00\"").unwrap();
        assert_eq!(parsed, TimeOfDay::from_hm(23, 0).unwrap());
    }

    #[test]
    fn ordering_follows_the_clock() {
        let morning = TimeOfDay::from_hm(8, 30).unwrap();
        let evening = TimeOfDay::from_hm(20, 0).unwrap();
        assert!(morning < evening);
    }
}
