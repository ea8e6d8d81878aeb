//! Error taxonomy of the checkout flow.
//!
//! Every error is terminal for the current step only: the caller shows the
//! message and the customer may retry the same step. Nothing is retried
//! automatically.

use otpc_sdk::client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Neither a phone number nor an email was given.
    #[error("please provide a phone number or email to receive the OTP")]
    InvalidContact,

    /// The code was empty, expired, or rejected by the backend.
    #[error("invalid OTP: {0}")]
    InvalidCode(String),

    /// The request never got an answer from the backend.
    #[error("network error: {0}")]
    Network(#[source] ClientError),

    /// The backend rejected the request.
    #[error("{message}")]
    Backend { message: String },

    /// A code must be requested before it can be resent or verified.
    #[error("no OTP has been requested yet")]
    OtpNotRequested,

    /// Payment steps require a verified contact.
    #[error("contact has not been verified")]
    NotVerified,

    #[error("contact is already verified")]
    AlreadyVerified,

    /// A code was already sent to a different contact in this session.
    #[error("OTP was sent to a different contact; resend to the original contact instead")]
    ContactLocked,

    /// The session's payment was already confirmed.
    #[error("payment has already been completed")]
    AlreadyPaid,

    /// Payment collection was attempted before an order was created.
    #[error("no payment order has been created")]
    NoOrder,

    /// The payment widget failed to open.
    #[error("payment widget error: {0}")]
    Widget(String),

    /// The widget was closed without reporting a result.
    #[error("payment was abandoned")]
    PaymentAbandoned,

    #[error("payment timed out")]
    PaymentTimedOut,

    #[error("payment was cancelled")]
    PaymentCancelled,
}

impl CheckoutError {
    /// Classify a client failure, mapping backend rejections with `rejected`.
    pub(crate) fn from_client(err: ClientError, rejected: impl FnOnce(String) -> Self) -> Self {
        match err {
            ClientError::Backend { message } => rejected(message),
            other => Self::Network(other),
        }
    }

    pub(crate) fn backend(message: String) -> Self {
        Self::Backend { message }
    }
}
