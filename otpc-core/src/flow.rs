//! The complete OTP-then-pay checkout over a single session.

use std::sync::Arc;
use std::time::Duration;

use otpc_sdk::objects::{PaymentResult, Prefill, Theme};
use tokio::sync::watch;

use crate::api::CheckoutApi;
use crate::error::CheckoutError;
use crate::events::{FlowEventSender, FlowEvents};
use crate::otp_gate::OtpGate;
use crate::payment::{PaymentCanceller, PaymentFlow, PaymentWidget};
use crate::session::{CheckoutSession, ContactInfo, OrderDraft};

/// How the storefront presents itself inside the payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storefront {
    pub name: String,
    pub description: String,
    pub theme: Theme,
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            name: "My E-Commerce".to_string(),
            description: "Order Payment".to_string(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    pub storefront: Storefront,
    /// Where the front end should navigate after a confirmed payment.
    pub redirect: String,
    /// How long to wait for the widget before giving up. `None` waits
    /// until the widget reports or the step is cancelled.
    pub widget_timeout: Option<Duration>,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            storefront: Storefront::default(),
            redirect: "/".to_string(),
            widget_timeout: Some(Duration::from_secs(15 * 60)),
        }
    }
}

/// One checkout: an [`OtpGate`] followed by a [`PaymentFlow`], both
/// operating on the same [`CheckoutSession`].
///
/// Each step takes `&mut self`, so at most one request is in flight per
/// checkout.
pub struct CheckoutOtpFlow<A, W> {
    api: A,
    widget: W,
    settings: FlowSettings,
    session: CheckoutSession,
    events: FlowEvents,
    cancel: Arc<watch::Sender<bool>>,
}

impl<A: CheckoutApi, W: PaymentWidget> CheckoutOtpFlow<A, W> {
    pub fn new(api: A, widget: W, settings: FlowSettings) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            api,
            widget,
            settings,
            session: CheckoutSession::new(),
            events: FlowEvents::disabled(),
            cancel: Arc::new(cancel),
        }
    }

    /// Report progress on `sender`.
    pub fn with_events(mut self, sender: FlowEventSender) -> Self {
        self.events = FlowEvents::new(sender);
        self
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Handle that aborts a pending widget step from another task.
    pub fn canceller(&self) -> PaymentCanceller {
        PaymentCanceller::new(self.cancel.clone())
    }

    pub async fn request_otp(&mut self, contact: ContactInfo) -> Result<(), CheckoutError> {
        OtpGate::new(&self.api, &self.events)
            .request_otp(&mut self.session, contact)
            .await
    }

    pub async fn resend_otp(&mut self) -> Result<(), CheckoutError> {
        OtpGate::new(&self.api, &self.events)
            .resend_otp(&mut self.session)
            .await
    }

    pub async fn verify_otp(&mut self, code: &str) -> Result<(), CheckoutError> {
        OtpGate::new(&self.api, &self.events)
            .verify_otp(&mut self.session, code)
            .await
    }

    pub async fn create_order(
        &mut self,
        shipping_address: &str,
    ) -> Result<OrderDraft, CheckoutError> {
        let (flow, session) = self.payment_flow();
        flow.create_order(session, shipping_address).await
    }

    /// Open the widget for the current order, pre-filled with the
    /// customer's name and the captured contact.
    pub async fn collect_payment(
        &mut self,
        customer_name: &str,
    ) -> Result<PaymentResult, CheckoutError> {
        let prefill = self.prefill(customer_name);
        let (flow, session) = self.payment_flow();
        flow.collect_payment(session, prefill).await
    }

    pub async fn confirm_payment(&mut self, result: &PaymentResult) -> Result<(), CheckoutError> {
        let (flow, session) = self.payment_flow();
        flow.confirm_payment(session, result).await
    }

    /// Create an order, collect payment through the widget, and confirm it.
    ///
    /// Stops at the first failing step; the session keeps whatever the
    /// earlier steps produced.
    pub async fn checkout(
        &mut self,
        shipping_address: &str,
        customer_name: &str,
    ) -> Result<PaymentResult, CheckoutError> {
        self.create_order(shipping_address).await?;
        let result = self.collect_payment(customer_name).await?;
        self.confirm_payment(&result).await?;
        Ok(result)
    }

    fn payment_flow(&mut self) -> (PaymentFlow<'_, A, W>, &mut CheckoutSession) {
        (
            PaymentFlow::new(
                &self.api,
                &self.widget,
                &self.events,
                &self.settings,
                &self.cancel,
            ),
            &mut self.session,
        )
    }

    fn prefill(&self, customer_name: &str) -> Prefill {
        let contact = self.session.contact();
        Prefill {
            name: customer_name.trim().to_owned(),
            contact: contact
                .and_then(ContactInfo::phone_number)
                .unwrap_or_default()
                .to_owned(),
            email: contact
                .and_then(ContactInfo::email_address)
                .map(str::to_owned),
        }
    }
}
