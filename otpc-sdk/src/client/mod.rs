//! HTTP client for the checkout API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod checkout;

pub use checkout::CheckoutClient;
pub use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::objects::ResponseStatus;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code without a status body.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The backend answered with `{"status": "error", "message": ...}`.
    #[error("{message}")]
    Backend { message: String },
}

impl ClientError {
    /// Whether the request failed before the backend could accept or
    /// reject it.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Backend { .. })
    }
}

/// Decode a checkout API response.
///
/// A body whose `status` is not `"success"` becomes [`ClientError::Backend`]
/// whatever the HTTP status code; other non-2xx responses become
/// [`ClientError::Api`].
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    decode_body(status, &bytes)
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ClientError> {
    match serde_json::from_slice::<ResponseStatus>(bytes) {
        Ok(header) if !header.is_success() => Err(ClientError::Backend {
            message: header.failure_message(),
        }),
        Ok(_) if status.is_success() => serde_json::from_slice(bytes).map_err(ClientError::Json),
        Err(e) if status.is_success() => Err(ClientError::Json(e)),
        _ => Err(ClientError::Api {
            status,
            body: String::from_utf8_lossy(bytes).into_owned(),
        }),
    }
}
