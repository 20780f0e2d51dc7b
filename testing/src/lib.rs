//! # LearnHub Testing
//!
//! Testing utilities and helpers for the LearnHub state container.
//!
//! This crate provides:
//! - Deterministic clocks for the environment
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Replay helpers for determinism properties
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use learnhub_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(AppReducer::new())
//!     .with_env(AppEnvironment::for_tests(test_clock()))
//!     .given_state(AppState::default())
//!     .when_action(AppAction::AddToCart(course))
//!     .then_state(|state| assert_eq!(state.cart.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use learnhub_core::environment::Clock;
use std::sync::Mutex;

/// Ergonomic Given-When-Then testing for reducers
pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Mutex, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use learnhub_testing::mocks::FixedClock;
    /// use learnhub_core::environment::Clock;
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

    /// Clock that advances by a fixed step on every read
    ///
    /// Useful where ids are derived from the current time and two reads
    /// must not collide (orders placed back to back, dashboard courses).
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing `step` per call to `now`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            match self.next.lock() {
                Ok(mut next) => {
                    let now = *next;
                    *next = now + self.step;
                    now
                },
                Err(poisoned) => *poisoned.into_inner(),
            }
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Create a stepping clock starting at 2025-01-01 that advances 1ms per read
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(epoch(), Duration::milliseconds(1))
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

/// Property-based testing helpers
///
/// Reducers are pure, so the state after an action log is a function of the
/// initial state and the log alone.
pub mod properties {
    use learnhub_core::reducer::Reducer;

    /// Fold `actions` into `initial` with `reducer`, discarding effects
    pub fn replay<R, I>(reducer: &R, env: &R::Environment, initial: R::State, actions: I) -> R::State
    where
        R: Reducer,
        I: IntoIterator<Item = R::Action>,
    {
        let mut state = initial;
        for action in actions {
            let _ = reducer.reduce(&mut state, action, env);
        }
        state
    }
}

// Re-export commonly used items
pub use mocks::{stepping_clock, test_clock, FixedClock, SteppingClock};
pub use properties::replay;
pub use reducer_test::{assertions, ReducerTest};
