//! Payment step: order creation, widget handoff, confirmation.

mod flow;
mod widget;

pub use flow::PaymentFlow;
pub use widget::{PaymentCanceller, PaymentWidget, WidgetCompletion, WidgetError};
