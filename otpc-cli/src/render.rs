//! Printing flow events on stdout.

use clap::ValueEnum;
use otpc_core::FlowEvent;
use otpc_core::events::FlowEventReceiver;
use otpc_sdk::objects::payment::minor_to_major;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable status lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Print every event queued so far.
pub fn flush_events(rx: &mut FlowEventReceiver, format: OutputFormat) {
    while let Ok(event) = rx.try_recv() {
        match render(&event, format) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!("Failed to render event: {}", e),
        }
    }
}

pub fn render(event: &FlowEvent, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(describe(event)),
        OutputFormat::Json => serde_json::to_string(event),
    }
}

fn describe(event: &FlowEvent) -> String {
    match event {
        FlowEvent::OtpSent { expires_at: None } => "OTP sent successfully!".to_string(),
        FlowEvent::OtpSent {
            expires_at: Some(at),
        } => format!("OTP sent successfully! It expires at {at}."),
        FlowEvent::OtpResent { sends } => format!("OTP resent successfully! ({sends} sent)"),
        FlowEvent::OtpVerified => "OTP verified! You can now proceed to payment.".to_string(),
        FlowEvent::OrderCreated {
            order_id,
            amount,
            currency,
            ..
        } => match order_id {
            Some(id) => format!("Order {id} created for {} {currency}.", minor_to_major(*amount)),
            None => format!("Order created for {} {currency}.", minor_to_major(*amount)),
        },
        FlowEvent::WidgetOpened { gateway_order_id } => {
            format!("Payment window opened for {gateway_order_id}.")
        }
        FlowEvent::PaymentConfirmed { redirect } => {
            format!("Payment successful! Continue at {redirect}")
        }
        FlowEvent::StepFailed { step, message } => format!("Error {step}: {message}"),
    }
}
