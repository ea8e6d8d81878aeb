//! Per-checkout state.
//!
//! A [`CheckoutSession`] lives for one page load (or one CLI run). It is
//! created empty, gains an [`OtpSession`] when the first code is sent, and
//! an [`OrderDraft`] once the contact is verified and an order is created.
//! Nothing here is persisted; the backend session cookie is the only state
//! that outlives it.

use otpc_sdk::objects::payment::minor_to_major;
use otpc_sdk::objects::{CreateOrderResponse, SendOtpRequest, VerifyOtpRequest};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::CheckoutError;

/// Channels a one-time password can be delivered to.
///
/// Both fields are trimmed on construction and blank values are dropped, so
/// a `ContactInfo` never carries an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContactInfo {
    phone: Option<String>,
    email: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl ContactInfo {
    pub fn new(phone: Option<&str>, email: Option<&str>) -> Self {
        Self {
            phone: non_blank(phone),
            email: non_blank(email),
        }
    }

    pub fn phone(phone: &str) -> Self {
        Self::new(Some(phone), None)
    }

    pub fn email(email: &str) -> Self {
        Self::new(None, Some(email))
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email_address(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none()
    }

    /// Reject a contact with no usable channel.
    pub fn validated(self) -> Result<Self, CheckoutError> {
        if self.is_empty() {
            Err(CheckoutError::InvalidContact)
        } else {
            Ok(self)
        }
    }

    pub(crate) fn send_request(&self) -> SendOtpRequest {
        SendOtpRequest {
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }

    pub(crate) fn verify_request(&self, otp: &str) -> VerifyOtpRequest {
        VerifyOtpRequest {
            otp: otp.to_owned(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

/// The contact a code was sent to, captured when the first send succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpSession {
    pub contact: ContactInfo,
    pub verified: bool,
    /// Number of codes dispatched, including the first.
    pub sends: u32,
    /// Expiry of the most recent code, when the backend reported one.
    pub expires_at: Option<OffsetDateTime>,
}

impl OtpSession {
    pub(crate) fn new(contact: ContactInfo, expires_at: Option<OffsetDateTime>) -> Self {
        Self {
            contact,
            verified: false,
            sends: 1,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}

/// Progress of the OTP gate. There is no transition back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpState {
    Idle,
    AwaitingCode,
    Verified,
}

/// A payment order created after the contact was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub shipping_address: String,
    /// Merchant-side order reference.
    pub order_id: Option<String>,
    /// Public key the widget authenticates with.
    pub payment_key: String,
    /// Amount in the currency's minor unit.
    pub amount: u64,
    pub currency: String,
    pub gateway_order_id: String,
}

impl OrderDraft {
    pub(crate) fn from_response(shipping_address: String, response: CreateOrderResponse) -> Self {
        Self {
            shipping_address,
            order_id: response.order_id,
            payment_key: response.key,
            amount: response.amount,
            currency: response.currency,
            gateway_order_id: response.razorpay_order_id,
        }
    }

    pub fn major_amount(&self) -> Decimal {
        minor_to_major(self.amount)
    }
}

/// Progress of the payment step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaymentStage {
    #[default]
    NotStarted,
    OrderCreated,
    /// The widget is open and the flow is suspended on its completion.
    AwaitingWidget,
    /// The widget returned a result that the backend has not yet accepted.
    AwaitingConfirmation,
    Completed,
}

/// All state of one checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: Uuid,
    pub(crate) otp: Option<OtpSession>,
    pub(crate) order: Option<OrderDraft>,
    pub(crate) payment: PaymentStage,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            otp: None,
            order: None,
            payment: PaymentStage::NotStarted,
        }
    }

    /// Identifier used to correlate log lines of one checkout.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn otp_state(&self) -> OtpState {
        match &self.otp {
            None => OtpState::Idle,
            Some(otp) if otp.verified => OtpState::Verified,
            Some(_) => OtpState::AwaitingCode,
        }
    }

    pub fn otp(&self) -> Option<&OtpSession> {
        self.otp.as_ref()
    }

    /// The contact captured by the first successful send.
    pub fn contact(&self) -> Option<&ContactInfo> {
        self.otp.as_ref().map(|otp| &otp.contact)
    }

    pub fn is_verified(&self) -> bool {
        self.otp_state() == OtpState::Verified
    }

    pub fn order(&self) -> Option<&OrderDraft> {
        self.order.as_ref()
    }

    pub fn payment_stage(&self) -> PaymentStage {
        self.payment
    }
}
