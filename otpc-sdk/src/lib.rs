//! Shared types and HTTP client for the OTP-gated checkout API.
//!
//! The backend exposes four JSON endpoints: send (or resend) a one-time
//! password, verify it, create a payment order, and verify the signed result
//! returned by the payment widget. This crate holds the wire objects for
//! those endpoints, the gateway payment-signature algorithm, and, behind the
//! `client` feature, a typed `reqwest` client that carries the backend
//! session cookie.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod config;
pub mod objects;
pub mod signature;

#[cfg(feature = "client")]
pub mod client;
