//! Progress events of the checkout flow.
//!
//! The flow reports every completed or failed step as a [`FlowEvent`] so a
//! front end can update what the customer sees (status messages, which
//! section is visible, where to navigate) without inspecting the session.
//!
//! # Event Order
//!
//! 1. `OtpSent`, then zero or more `OtpResent`
//! 2. `OtpVerified`
//! 3. `OrderCreated` -> `WidgetOpened`
//! 4. `PaymentConfirmed`
//!
//! A `StepFailed` may appear after any step; the flow stays where it was.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, FlowEventReceiver, FlowEventSender, FlowEvents, flow_event_channel,
};
pub use types::{FlowEvent, FlowStep};
