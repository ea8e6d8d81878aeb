//! The backend seam of the checkout flow.
//!
//! [`CheckoutApi`] is implemented for the SDK's [`CheckoutClient`]; tests and
//! alternative transports provide their own implementations.

use async_trait::async_trait;
use otpc_sdk::client::{CheckoutClient, ClientError};
use otpc_sdk::objects::{
    Acknowledgement, CreateOrderRequest, CreateOrderResponse, PaymentResult, SendOtpRequest,
    SendOtpResponse, VerifyOtpRequest,
};

/// Backend endpoints consumed by the checkout flow.
///
/// Implementations return [`ClientError::Backend`] for responses whose
/// status is `"error"` and any other variant for transport failures.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    async fn send_otp(&self, request: &SendOtpRequest) -> Result<SendOtpResponse, ClientError>;

    async fn verify_otp(&self, request: &VerifyOtpRequest)
    -> Result<Acknowledgement, ClientError>;

    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError>;

    async fn verify_payment(&self, result: &PaymentResult)
    -> Result<Acknowledgement, ClientError>;
}

#[async_trait]
impl CheckoutApi for CheckoutClient {
    async fn send_otp(&self, request: &SendOtpRequest) -> Result<SendOtpResponse, ClientError> {
        CheckoutClient::send_otp(self, request).await
    }

    async fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> Result<Acknowledgement, ClientError> {
        CheckoutClient::verify_otp(self, request).await
    }

    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        CheckoutClient::create_order(self, request).await
    }

    async fn verify_payment(
        &self,
        result: &PaymentResult,
    ) -> Result<Acknowledgement, ClientError> {
        CheckoutClient::verify_payment(self, result).await
    }
}
