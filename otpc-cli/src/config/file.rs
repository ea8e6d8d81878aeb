//! TOML file configuration structures.
//!
//! These structs directly map to the `otpc.toml` file format.

use otpc_sdk::config::Endpoints;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub storefront: StorefrontConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Backend connection section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Root URL of the merchant backend (e.g., "http://localhost:5000").
    pub base_url: Url,
    /// Per-request timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_request_timeout() -> u64 {
    30
}

/// How the storefront is presented in the payment widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub name: String,
    pub description: String,
    /// Widget accent color as `#rgb` or `#rrggbb`.
    pub theme_color: String,
    /// Where to continue after a confirmed payment.
    pub redirect: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            name: "My E-Commerce".to_string(),
            description: "Order Payment".to_string(),
            theme_color: "#3399cc".to_string(),
            redirect: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetMode {
    /// Print the widget options and read the gateway result from the terminal.
    #[default]
    Terminal,
    /// Sign a synthetic payment with `test_secret`. For test backends only.
    Simulated,
}

/// Payment widget section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub mode: WidgetMode,
    /// Seconds to wait for the widget. 0 waits until it reports or is cancelled.
    pub timeout_secs: u64,
    /// Gateway key secret of the test backend, used by the simulated widget.
    pub test_secret: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            mode: WidgetMode::Terminal,
            timeout_secs: 15 * 60,
            test_secret: None,
        }
    }
}
