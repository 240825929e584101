//! Payment bridge to a hosted checkout widget.
//!
//! The widget is an injected [`CheckoutProvider`] rather than an ambient
//! global. Opening a checkout returns a future that resolves once the visitor
//! either pays or dismisses the overlay; the two outcomes stand in for the
//! widget's success and dismiss callbacks.

use crate::booking::BookingContext;
use crate::error::BookingError;
use crate::money::Rupees;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// ISO 4217 currency of a checkout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Indian rupee
    #[default]
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    /// Three-letter code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
        }
    }
}

/// Everything the checkout widget needs to collect one payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Merchant key issued by the payment provider
    pub key: String,
    /// Amount in paise
    pub amount_minor_units: u64,
    /// Currency of the amount
    pub currency: Currency,
    /// Merchant name shown in the overlay header
    pub name: String,
    /// Line describing the purchase (the event title)
    pub description: String,
    /// Logo or event image shown in the overlay
    pub image: Option<String>,
    /// Accent color of the overlay
    pub theme_color: String,
}

/// How a checkout ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutOutcome {
    /// Payment captured
    Succeeded {
        /// Provider reference for the payment
        payment_reference: String,
    },
    /// Visitor closed the overlay without paying
    Dismissed,
}

/// A hosted checkout widget
pub trait CheckoutProvider: Send + Sync {
    /// Whether the widget is loaded and can be opened
    fn is_available(&self) -> bool;

    /// Opens the widget; the future resolves with the visitor's outcome
    fn open(&self, request: PaymentRequest) -> BoxFuture<'static, CheckoutOutcome>;
}

/// Merchant settings applied to every payment request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Provider key
    pub key: String,
    /// Merchant name
    pub merchant_name: String,
    /// Overlay accent color
    pub theme_color: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            merchant_name: "Event Booking".to_string(),
            theme_color: "#7c3aed".to_string(),
        }
    }
}

/// Turns a confirmed booking into a payment request
#[derive(Clone)]
pub struct PaymentBridge {
    provider: Arc<dyn CheckoutProvider>,
    config: CheckoutConfig,
}

impl PaymentBridge {
    /// Creates a bridge over a provider
    #[must_use]
    pub fn new(provider: Arc<dyn CheckoutProvider>, config: CheckoutConfig) -> Self {
        Self { provider, config }
    }

    /// The provider checkouts are opened on
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn CheckoutProvider> {
        &self.provider
    }

    /// Builds the payment request for `total`
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidAmount`] if `total` is zero
    /// - [`BookingError::CheckoutUnavailable`] if the widget is not loaded
    /// - [`BookingError::AmountOverflow`] if the total does not fit in paise
    pub fn prepare(
        &self,
        context: &BookingContext,
        total: Rupees,
    ) -> Result<PaymentRequest, BookingError> {
        if total.is_zero() {
            return Err(BookingError::InvalidAmount);
        }
        if !self.provider.is_available() {
            return Err(BookingError::CheckoutUnavailable);
        }
        let amount_minor_units = total.to_paise().ok_or(BookingError::AmountOverflow)?;

        Ok(PaymentRequest {
            key: self.config.key.clone(),
            amount_minor_units,
            currency: Currency::Inr,
            name: self.config.merchant_name.clone(),
            description: context.title.clone(),
            image: context.image.clone(),
            theme_color: self.config.theme_color.clone(),
        })
    }
}

impl std::fmt::Debug for PaymentBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentBridge")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Development checkout that pays every request after a short delay
#[derive(Clone, Debug)]
pub struct SimulatedCheckout {
    delay: Duration,
}

impl SimulatedCheckout {
    /// Creates a simulated checkout that completes after `delay`
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<dyn CheckoutProvider> {
        Arc::new(Self::default())
    }
}

impl Default for SimulatedCheckout {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl CheckoutProvider for SimulatedCheckout {
    fn is_available(&self) -> bool {
        true
    }

    fn open(&self, request: PaymentRequest) -> BoxFuture<'static, CheckoutOutcome> {
        let delay = self.delay;
        Box::pin(async move {
            tracing::info!(
                amount_minor_units = request.amount_minor_units,
                currency = request.currency.code(),
                description = %request.description,
                "Simulated checkout opened"
            );
            tokio::time::sleep(delay).await;

            let payment_reference = format!("sim_pay_{}", Uuid::new_v4().simple());
            tracing::info!(%payment_reference, "Simulated checkout captured payment");
            CheckoutOutcome::Succeeded { payment_reference }
        })
    }
}

/// Checkout whose widget never loaded
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableCheckout;

impl CheckoutProvider for UnavailableCheckout {
    fn is_available(&self) -> bool {
        false
    }

    fn open(&self, _request: PaymentRequest) -> BoxFuture<'static, CheckoutOutcome> {
        tracing::warn!("Checkout opened while the widget is unavailable");
        Box::pin(async { CheckoutOutcome::Dismissed })
    }
}
