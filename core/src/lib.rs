//! # Ticketbooth Core
//!
//! The abstractions every ticketbooth feature is written against.
//!
//! - **State**: plain owned data describing one feature (a booking flow, a details page)
//! - **Action**: every input a feature reacts to: user intents and results of effects
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`, no I/O
//! - **Effect**: a description of work for the runtime (notify, navigate, open checkout)
//! - **Environment**: collaborators injected as traits so tests can swap in fakes
//!
//! ## Example
//!
//! ```
//! use ticketbooth_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Quantity(u32);
//!
//! enum QuantityAction {
//!     Increment,
//! }
//!
//! struct QuantityReducer;
//!
//! impl Reducer for QuantityReducer {
//!     type State = Quantity;
//!     type Action = QuantityAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Quantity,
//!         action: QuantityAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<QuantityAction>; 4]> {
//!         match action {
//!             QuantityAction::Increment => state.0 += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = Quantity::default();
//! QuantityReducer.reduce(&mut state, QuantityAction::Increment, &());
//! assert_eq!(state.0, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

mod effect_macros;

/// Reducer trait: the home of all business logic.
pub mod reducer {
    use super::{effect::Effect, SmallVec};

    /// Business logic for one feature.
    ///
    /// Reducers mutate state in place and return descriptions of the side
    /// effects that should follow. They never perform I/O themselves, which
    /// keeps every transition testable without a runtime.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect descriptions returned by reducers and executed by the runtime.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// A side effect to be executed by the `Store`.
    ///
    /// Effects are values. Nothing happens until the runtime executes them,
    /// and an action produced by an effect is fed back into the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another, each finishing before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Resolves to `Option<Action>`; `Some` is dispatched back to the store.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing at all
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Future(_) => false,
            }
        }

        /// Lift the actions this effect produces into a parent action type.
        ///
        /// Used when a parent reducer embeds a child reducer: the child's
        /// effects are mapped so their feedback reaches the parent store.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            Action: Send + 'static,
            B: Send + 'static,
            F: Fn(Action) -> B + Clone + Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}

/// Environment traits shared by every feature.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock used outside of tests
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[derive(Debug, PartialEq)]
    enum Child {
        Done(u32),
    }

    #[derive(Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn is_none_sees_through_composites() {
        let effect: Effect<Child> = Effect::merge(vec![Effect::None, Effect::chain(vec![])]);
        assert!(effect.is_none());

        let effect: Effect<Child> = Effect::chain(vec![
            Effect::None,
            Effect::Future(Box::pin(async { None })),
        ]);
        assert!(!effect.is_none());
    }

    #[tokio::test]
    async fn map_lifts_future_output() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Done(7)) }));

        let Effect::Future(fut) = effect.map(Parent::Child) else {
            unreachable!("map keeps the variant");
        };

        assert_eq!(fut.await, Some(Parent::Child(Child::Done(7))));
    }

    #[test]
    fn map_keeps_structure() {
        let effect: Effect<Child> = Effect::merge(vec![Effect::None, Effect::None]);

        match effect.map(Parent::Child) {
            Effect::Parallel(effects) => assert_eq!(effects.len(), 2),
            other => unreachable!("unexpected {other:?}"),
        }
    }
}
