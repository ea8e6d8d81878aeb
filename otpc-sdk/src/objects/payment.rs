//! Payment order and gateway result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for creating a payment order from the session's cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub shipping_address: String,
}

/// Success payload of the create-order endpoint.
///
/// `key`, `amount`, `currency` and `razorpay_order_id` are handed to the
/// payment widget unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// Merchant-side order reference, if the backend assigned one.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Public key the widget authenticates with.
    pub key: String,
    /// Amount in the currency's minor unit (paise for INR).
    pub amount: u64,
    pub currency: String,
    /// Order identifier issued by the payment gateway.
    pub razorpay_order_id: String,
}

impl CreateOrderResponse {
    /// Amount in major units, assuming a two-decimal currency.
    pub fn major_amount(&self) -> Decimal {
        minor_to_major(self.amount)
    }
}

/// Convert a minor-unit amount of a two-decimal currency to major units.
pub fn minor_to_major(amount: u64) -> Decimal {
    Decimal::from(amount) / Decimal::ONE_HUNDRED
}

/// Signed result the payment widget returns on completion.
///
/// Opaque to the client: forwarded verbatim as the verify-payment body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentResult {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}
