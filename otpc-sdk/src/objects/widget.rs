//! Configuration handed to the third-party payment widget.

use serde::{Deserialize, Serialize};

/// Options the payment widget is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    /// Storefront name shown in the widget header.
    pub name: String,
    pub description: String,
    /// Gateway order identifier, not the merchant order reference.
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

/// Customer details pre-filled into the widget form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color: "#3399cc".to_string(),
        }
    }
}
