//! One-time-password request and response types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for sending (or resending) a code.
///
/// Absent channels are omitted from the JSON body rather than sent as empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Success payload of the send-OTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOtpResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// When the issued code stops being accepted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

/// Request body for verifying a code against the channel it was sent to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
