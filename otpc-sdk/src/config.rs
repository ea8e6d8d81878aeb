//! Endpoint configuration.

use serde::{Deserialize, Serialize};

/// Paths of the checkout API endpoints, relative to the backend base URL.
///
/// Sending and resending a code share one endpoint; the backend issues a
/// fresh code on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub send_otp: String,
    pub verify_otp: String,
    pub create_order: String,
    pub verify_payment: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            send_otp: "/resend-otp".to_string(),
            verify_otp: "/verify-otp".to_string(),
            create_order: "/payment/create-order".to_string(),
            verify_payment: "/payment/verify".to_string(),
        }
    }
}
