//! Payment signature algorithm of the gateway.
//!
//! When the widget completes, the gateway signs the payment with the
//! merchant's key secret:
//!
//! ```text
//! razorpay_signature = hex(HMAC-SHA256("{razorpay_order_id}|{razorpay_payment_id}", key_secret))
//! ```
//!
//! The backend verifies this before marking the order paid. The browser-side
//! flow never holds the secret; these helpers exist for test backends and
//! for the simulated widget used against them.

use crate::objects::PaymentResult;

/// Errors produced by signature operations.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid hex encoding")]
    InvalidHex,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

fn signing_key(key_secret: &[u8]) -> ring::hmac::Key {
    ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key_secret)
}

fn signed_data(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

/// Sign a completed payment, returning the lowercase hex signature.
pub fn sign_payment(order_id: &str, payment_id: &str, key_secret: &[u8]) -> String {
    let tag = ring::hmac::sign(
        &signing_key(key_secret),
        signed_data(order_id, payment_id).as_bytes(),
    );
    hex::encode(tag.as_ref())
}

/// Verify the signature carried in a widget result.
pub fn verify_payment(result: &PaymentResult, key_secret: &[u8]) -> Result<(), SignatureError> {
    let signature =
        hex::decode(&result.razorpay_signature).map_err(|_| SignatureError::InvalidHex)?;
    ring::hmac::verify(
        &signing_key(key_secret),
        signed_data(&result.razorpay_order_id, &result.razorpay_payment_id).as_bytes(),
        &signature,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(signature: String) -> PaymentResult {
        PaymentResult {
            razorpay_payment_id: "pay_29QQoUBi66xm2f".to_string(),
            razorpay_order_id: "order_9A33XWu170gUtm".to_string(),
            razorpay_signature: signature,
        }
    }

    #[test]
    fn signed_payment_verifies() {
        let secret = b"test_secret";
        let signature = sign_payment("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f", secret);
        assert_eq!(signature.len(), 64);
        assert!(verify_payment(&result(signature), secret).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signature = sign_payment("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f", b"one");
        assert!(matches!(
            verify_payment(&result(signature), b"two"),
            Err(SignatureError::SignatureMismatch)
        ));
    }

    #[test]
    fn swapped_ids_are_rejected() {
        let secret = b"test_secret";
        let signature = sign_payment("pay_29QQoUBi66xm2f", "order_9A33XWu170gUtm", secret);
        assert!(verify_payment(&result(signature), secret).is_err());
    }

    #[test]
    fn non_hex_signature() {
        assert!(matches!(
            verify_payment(&result("not-hex".to_string()), b"secret"),
            Err(SignatureError::InvalidHex)
        ));
    }
}
