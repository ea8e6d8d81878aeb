//! OTP-gated checkout flow.
//!
//! A checkout runs in two phases over one [`CheckoutSession`]:
//!
//! 1. [`OtpGate`] sends a one-time password to the customer's phone or email
//!    and verifies the code they enter (`Idle -> AwaitingCode -> Verified`).
//! 2. Once verified, [`PaymentFlow`] creates a payment order, hands it to a
//!    [`PaymentWidget`], and forwards the widget's signed result to the
//!    backend for confirmation.
//!
//! [`CheckoutOtpFlow`] composes both over a single session and reports
//! progress as [`FlowEvent`]s.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod api;
pub mod error;
pub mod events;
pub mod flow;
pub mod otp_gate;
pub mod payment;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::CheckoutApi;
pub use error::CheckoutError;
pub use events::{FlowEvent, FlowStep};
pub use flow::{CheckoutOtpFlow, FlowSettings, Storefront};
pub use otp_gate::OtpGate;
pub use payment::{PaymentCanceller, PaymentFlow, PaymentWidget, WidgetCompletion, WidgetError};
pub use session::{CheckoutSession, ContactInfo, OrderDraft, OtpSession, OtpState, PaymentStage};
