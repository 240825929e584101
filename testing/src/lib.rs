//! # Ticketbooth Testing
//!
//! Testing utilities for ticketbooth reducers:
//! - `ReducerTest`, a Given-When-Then harness that needs no runtime
//! - Effect assertions
//! - A fixed clock for deterministic timestamps
//!
//! ## Example
//!
//! ```ignore
//! use ticketbooth_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_env())
//!     .given_state(open_booking())
//!     .when_actions([BookingAction::SetQuantity(0)])
//!     .then_state(|state| assert_eq!(state.quantity(), Some(1)))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ticketbooth_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of core environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use ticketbooth_testing::mocks::FixedClock;
    /// use ticketbooth_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is a valid literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
