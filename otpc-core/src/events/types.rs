//! Event type definitions.

use serde::Serialize;
use time::OffsetDateTime;

/// A step of the checkout flow, as named in failure events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    SendOtp,
    ResendOtp,
    VerifyOtp,
    CreateOrder,
    CollectPayment,
    ConfirmPayment,
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowStep::SendOtp => write!(f, "sending OTP"),
            FlowStep::ResendOtp => write!(f, "resending OTP"),
            FlowStep::VerifyOtp => write!(f, "verifying OTP"),
            FlowStep::CreateOrder => write!(f, "creating order"),
            FlowStep::CollectPayment => write!(f, "collecting payment"),
            FlowStep::ConfirmPayment => write!(f, "confirming payment"),
        }
    }
}

/// Emitted by the flow after each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    /// The first code was dispatched; the code entry step is now active.
    OtpSent {
        #[serde(with = "time::serde::rfc3339::option")]
        expires_at: Option<OffsetDateTime>,
    },

    /// Another code was dispatched to the same contact.
    OtpResent {
        /// Codes dispatched so far, including the first.
        sends: u32,
    },

    /// The contact is verified; the payment step is now active.
    OtpVerified,

    OrderCreated {
        order_id: Option<String>,
        gateway_order_id: String,
        amount: u64,
        currency: String,
    },

    /// The payment widget is open and the flow waits for its result.
    WidgetOpened { gateway_order_id: String },

    /// The backend accepted the payment. The front end should navigate to
    /// `redirect`.
    PaymentConfirmed { redirect: String },

    /// A step failed. The message is suitable for showing to the customer.
    StepFailed { step: FlowStep, message: String },
}
