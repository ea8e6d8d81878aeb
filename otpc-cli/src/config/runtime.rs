//! Settings the CLI runs with once the file has been validated.
//!
//! The checkout flow's own settings live in `otpc-core`; this module
//! re-exports them next to the CLI-only parts.

use std::time::Duration;

use otpc_sdk::config::Endpoints;
use url::Url;

pub use otpc_core::{FlowSettings, Storefront};

/// Where and how to reach the merchant backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub endpoints: Endpoints,
}

/// Which widget the CLI drives the payment step with.
#[derive(Debug, Clone)]
pub enum WidgetSettings {
    Terminal,
    Simulated { key_secret: String },
}
