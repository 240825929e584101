//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```
/// use ticketbooth_core::{async_effect, effect::Effect};
///
/// #[derive(Debug)]
/// enum FlowAction {
///     CheckoutDismissed,
/// }
///
/// let effect: Effect<FlowAction> = async_effect! {
///     Some(FlowAction::CheckoutDismissed)
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug)]
    enum TestAction {
        Resolved { amount: u64 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Resolved { amount: 40_000 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn test_async_effect_runs_body() {
        let effect = async_effect! {
            Some(TestAction::Resolved { amount: 40_000 })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect always builds a future");
        };
        assert!(matches!(fut.await, Some(TestAction::Resolved { amount: 40_000 })));
    }
}
