//! Checkout API client (checkout page → merchant backend).
//!
//! The backend ties every call to a server-side session through a cookie it
//! sets on the first response, so the underlying `reqwest::Client` keeps a
//! cookie store for the lifetime of the [`CheckoutClient`].

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ClientError, parse_response};
use crate::config::Endpoints;
use crate::objects::{
    Acknowledgement, CreateOrderRequest, CreateOrderResponse, PaymentResult, SendOtpRequest,
    SendOtpResponse, VerifyOtpRequest,
};

/// Typed HTTP client for the checkout API.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    http: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl CheckoutClient {
    /// Create a new `CheckoutClient` with a cookie-carrying HTTP client.
    ///
    /// * `base_url` – root URL of the merchant backend (e.g. `https://shop.example.com`
    ///   or `https://shop.example.com/api`). Endpoint paths are resolved under
    ///   its path, so a prefix is kept.
    /// * `timeout` – per-request timeout; `None` leaves requests unbounded.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: as_directory(base_url),
            endpoints: Endpoints::default(),
        })
    }

    /// Override the endpoint paths.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replace the default `reqwest::Client` with a custom one.
    ///
    /// The replacement must keep a cookie store, otherwise the backend
    /// session is lost between calls.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /resend-otp` – dispatch a fresh code to the given channel(s).
    pub async fn send_otp(&self, body: &SendOtpRequest) -> Result<SendOtpResponse, ClientError> {
        self.post(&self.endpoints.send_otp, body).await
    }

    /// `POST /verify-otp` – check a code against the last one dispatched.
    pub async fn verify_otp(
        &self,
        body: &VerifyOtpRequest,
    ) -> Result<Acknowledgement, ClientError> {
        self.post(&self.endpoints.verify_otp, body).await
    }

    /// `POST /payment/create-order` – turn the session's cart into a gateway
    /// order.
    pub async fn create_order(
        &self,
        body: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        self.post(&self.endpoints.create_order, body).await
    }

    /// `POST /payment/verify` – forward the widget result for signature
    /// verification.
    pub async fn verify_payment(
        &self,
        result: &PaymentResult,
    ) -> Result<Acknowledgement, ClientError> {
        self.post(&self.endpoints.verify_payment, result).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        tracing::debug!(endpoint = %url, "sending checkout request");

        let resp = self.http.post(url).json(body).send().await?;

        parse_response(resp).await
    }
}

/// Make `url` usable as a base for relative joins by ending its path in `/`.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::post,
    };
    use serde_json::{Value, json};

    async fn spawn_backend(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn has_session(headers: &HeaderMap) -> bool {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("session=s3cr3t"))
    }

    async fn send_otp(Json(body): Json<Value>) -> impl IntoResponse {
        let status = if body.get("email").is_none() && body.get("phone").is_some() {
            json!({"status": "success", "message": "OTP sent successfully", "expires_at": "2030-01-01T00:05:00Z"})
        } else {
            json!({"status": "error", "message": "unexpected body"})
        };
        (
            [(header::SET_COOKIE, "session=s3cr3t; Path=/; HttpOnly")],
            Json(status),
        )
    }

    async fn verify_otp(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
        if !has_session(&headers) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"status": "error", "message": "no session"})),
            );
        }
        if body["otp"] == "123456" && body["phone"] == "+15551234567" {
            (
                StatusCode::OK,
                Json(json!({"status": "success", "message": "OTP verified"})),
            )
        } else {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": "Invalid OTP"})),
            )
        }
    }

    async fn create_order(Json(body): Json<Value>) -> impl IntoResponse {
        assert_eq!(body["shipping_address"], "221B Baker St");
        Json(json!({
            "status": "success",
            "order_id": "O1",
            "razorpay_order_id": "rp_1",
            "key": "k1",
            "amount": 1000,
            "currency": "INR"
        }))
    }

    async fn verify_payment() -> impl IntoResponse {
        (StatusCode::BAD_GATEWAY, "upstream unavailable")
    }

    fn router() -> Router {
        Router::new()
            .route("/resend-otp", post(send_otp))
            .route("/verify-otp", post(verify_otp))
            .route("/payment/create-order", post(create_order))
            .route("/payment/verify", post(verify_payment))
    }

    fn phone_request() -> SendOtpRequest {
        SendOtpRequest {
            phone: Some("+15551234567".to_string()),
            email: None,
        }
    }

    #[tokio::test]
    async fn session_cookie_is_carried_to_verify() {
        let base = spawn_backend(router()).await;
        let client = CheckoutClient::new(base, Some(Duration::from_secs(5))).unwrap();

        let sent = client.send_otp(&phone_request()).await.unwrap();
        assert!(sent.expires_at.is_some());

        let ack = client
            .verify_otp(&VerifyOtpRequest {
                otp: "123456".to_string(),
                phone: Some("+15551234567".to_string()),
                email: None,
            })
            .await
            .unwrap();
        assert_eq!(ack.message.as_deref(), Some("OTP verified"));
    }

    #[tokio::test]
    async fn rejected_code_is_backend_error() {
        let base = spawn_backend(router()).await;
        let client = CheckoutClient::new(base, None).unwrap();
        client.send_otp(&phone_request()).await.unwrap();

        let err = client
            .verify_otp(&VerifyOtpRequest {
                otp: "000000".to_string(),
                phone: Some("+15551234567".to_string()),
                email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Backend { ref message } if message == "Invalid OTP"));
    }

    #[tokio::test]
    async fn verify_without_session_is_rejected() {
        let base = spawn_backend(router()).await;
        let client = CheckoutClient::new(base, None).unwrap();

        let err = client
            .verify_otp(&VerifyOtpRequest {
                otp: "123456".to_string(),
                phone: Some("+15551234567".to_string()),
                email: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no session");
    }

    #[tokio::test]
    async fn create_order_payload() {
        let base = spawn_backend(router()).await;
        let client = CheckoutClient::new(base, None).unwrap();

        let order = client
            .create_order(&CreateOrderRequest {
                shipping_address: "221B Baker St".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(order.order_id.as_deref(), Some("O1"));
        assert_eq!(order.razorpay_order_id, "rp_1");
        assert_eq!(order.amount, 1000);
    }

    #[tokio::test]
    async fn plain_text_gateway_error_is_transport_failure() {
        let base = spawn_backend(router()).await;
        let client = CheckoutClient::new(base, None).unwrap();

        let err = client
            .verify_payment(&PaymentResult {
                razorpay_payment_id: "pay_1".to_string(),
                razorpay_order_id: "rp_1".to_string(),
                razorpay_signature: "00".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::BAD_GATEWAY));
    }

    #[tokio::test]
    async fn custom_endpoints_are_used() {
        let router = Router::new().route("/api/otp/send", post(send_otp));
        let base = spawn_backend(router).await;
        let client = CheckoutClient::new(base, None).unwrap().with_endpoints(Endpoints {
            send_otp: "/api/otp/send".to_string(),
            ..Endpoints::default()
        });

        assert!(client.send_otp(&phone_request()).await.is_ok());
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let router = Router::new().nest("/api", router());
        let base = spawn_backend(router).await;

        for prefix in ["api/", "api"] {
            let client = CheckoutClient::new(base.join(prefix).unwrap(), None).unwrap();
            let sent = client.send_otp(&phone_request()).await.unwrap();
            assert!(sent.expires_at.is_some());

            let order = client
                .create_order(&CreateOrderRequest {
                    shipping_address: "221B Baker St".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(order.razorpay_order_id, "rp_1");
        }
    }

    #[test]
    fn base_url_is_treated_as_directory() {
        let base = Url::parse("https://shop.example.com/api").unwrap();
        assert_eq!(as_directory(base).as_str(), "https://shop.example.com/api/");
        let root = Url::parse("https://shop.example.com").unwrap();
        assert_eq!(as_directory(root).as_str(), "https://shop.example.com/");
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}")).unwrap();
        let client = CheckoutClient::new(base, Some(Duration::from_secs(2))).unwrap();

        let err = client.send_otp(&phone_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
        assert!(err.is_transport());
    }
}
