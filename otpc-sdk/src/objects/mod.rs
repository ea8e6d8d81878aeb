//! Request and response bodies of the checkout API.
//!
//! Every response carries a `status` field. `"success"` bodies additionally
//! carry the endpoint's payload; `"error"` bodies carry a human-readable
//! `message`. The backend also uses error bodies on 4xx/5xx responses, so the
//! status field, not the HTTP status code, decides whether a call was
//! rejected.

pub mod otp;
pub mod payment;
pub mod widget;

pub use otp::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest};
pub use payment::{CreateOrderRequest, CreateOrderResponse, PaymentResult};
pub use widget::{Prefill, Theme, WidgetOptions};

use serde::{Deserialize, Serialize};

/// Outcome reported in the `status` field of every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
    /// Any other value. Treated as a failure, like `Error`.
    #[serde(other)]
    Unknown,
}

/// The part of a response body shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub status: ApiStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }

    /// The backend message, or a generic fallback when the body had none.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "request rejected by backend".to_string())
    }
}

/// Success body of endpoints that return nothing but a status and an
/// optional message (verify OTP, verify payment).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_status() {
        let status: ResponseStatus =
            serde_json::from_str(r#"{"status":"error","message":"Invalid OTP"}"#).unwrap();
        assert!(!status.is_success());
        assert_eq!(status.failure_message(), "Invalid OTP");
    }

    #[test]
    fn unknown_status_is_not_success() {
        let status: ResponseStatus = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(status.status, ApiStatus::Unknown);
        assert!(!status.is_success());
        assert_eq!(status.failure_message(), "request rejected by backend");
    }

    #[test]
    fn success_status_ignores_payload_fields() {
        let status: ResponseStatus =
            serde_json::from_str(r#"{"status":"success","order_id":"O1","amount":1000}"#)
                .unwrap();
        assert!(status.is_success());
        assert_eq!(status.message, None);
    }
}
