//! Order creation, widget handoff and payment confirmation.

use std::future;

use otpc_sdk::objects::{CreateOrderRequest, PaymentResult, Prefill, WidgetOptions};
use tokio::sync::watch;
use tracing::{info, warn};

use super::widget::{PaymentWidget, WidgetCompletion};
use crate::api::CheckoutApi;
use crate::error::CheckoutError;
use crate::events::{FlowEvent, FlowEvents, FlowStep};
use crate::flow::FlowSettings;
use crate::session::{CheckoutSession, OrderDraft, PaymentStage};

/// Drives the payment step of a verified [`CheckoutSession`].
///
/// Every operation checks locally that the session is verified and fails
/// with [`CheckoutError::NotVerified`] without contacting the backend
/// otherwise. Once the payment is confirmed, every operation fails with
/// [`CheckoutError::AlreadyPaid`].
pub struct PaymentFlow<'a, A: CheckoutApi + ?Sized, W: PaymentWidget + ?Sized> {
    api: &'a A,
    widget: &'a W,
    events: &'a FlowEvents,
    settings: &'a FlowSettings,
    cancel: &'a watch::Sender<bool>,
}

impl<'a, A, W> PaymentFlow<'a, A, W>
where
    A: CheckoutApi + ?Sized,
    W: PaymentWidget + ?Sized,
{
    pub fn new(
        api: &'a A,
        widget: &'a W,
        events: &'a FlowEvents,
        settings: &'a FlowSettings,
        cancel: &'a watch::Sender<bool>,
    ) -> Self {
        Self {
            api,
            widget,
            events,
            settings,
            cancel,
        }
    }

    /// Create a payment order for the session's cart.
    #[tracing::instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn create_order(
        &self,
        session: &mut CheckoutSession,
        shipping_address: &str,
    ) -> Result<OrderDraft, CheckoutError> {
        let result = self.create(session, shipping_address).await;
        self.events.report(FlowStep::CreateOrder, result)
    }

    /// Open the widget for the session's order and wait for its result.
    ///
    /// Resolves when the widget reports a result, the customer closes it
    /// ([`CheckoutError::PaymentAbandoned`]), the configured timeout elapses
    /// ([`CheckoutError::PaymentTimedOut`]), or a [`PaymentCanceller`] fires
    /// ([`CheckoutError::PaymentCancelled`]). On failure the order is kept
    /// and the widget may be opened again.
    ///
    /// [`PaymentCanceller`]: super::PaymentCanceller
    #[tracing::instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn collect_payment(
        &self,
        session: &mut CheckoutSession,
        prefill: Prefill,
    ) -> Result<PaymentResult, CheckoutError> {
        let result = self.collect(session, prefill).await;
        self.events.report(FlowStep::CollectPayment, result)
    }

    /// Forward the widget's result to the backend for signature
    /// verification.
    #[tracing::instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn confirm_payment(
        &self,
        session: &mut CheckoutSession,
        result: &PaymentResult,
    ) -> Result<(), CheckoutError> {
        let outcome = self.confirm(session, result).await;
        self.events.report(FlowStep::ConfirmPayment, outcome)
    }

    async fn create(
        &self,
        session: &mut CheckoutSession,
        shipping_address: &str,
    ) -> Result<OrderDraft, CheckoutError> {
        ensure_payable(session)?;

        let request = CreateOrderRequest {
            shipping_address: shipping_address.to_owned(),
        };
        let response = self
            .api
            .create_order(&request)
            .await
            .map_err(|e| CheckoutError::from_client(e, CheckoutError::backend))?;

        let draft = OrderDraft::from_response(request.shipping_address, response);
        info!(
            order_id = ?draft.order_id,
            gateway_order_id = %draft.gateway_order_id,
            amount = draft.amount,
            currency = %draft.currency,
            "payment order created"
        );
        self.events.emit(FlowEvent::OrderCreated {
            order_id: draft.order_id.clone(),
            gateway_order_id: draft.gateway_order_id.clone(),
            amount: draft.amount,
            currency: draft.currency.clone(),
        });
        session.order = Some(draft.clone());
        session.payment = PaymentStage::OrderCreated;
        Ok(draft)
    }

    async fn collect(
        &self,
        session: &mut CheckoutSession,
        prefill: Prefill,
    ) -> Result<PaymentResult, CheckoutError> {
        ensure_payable(session)?;
        let draft = session.order.as_ref().ok_or(CheckoutError::NoOrder)?;
        let options = self.widget_options(draft, prefill);
        let gateway_order_id = draft.gateway_order_id.clone();

        // Clear a cancellation left over from an earlier opening.
        self.cancel.send_replace(false);
        let mut cancel_rx = self.cancel.subscribe();

        let (completion, outcome) = WidgetCompletion::channel();
        self.widget
            .open(options, completion)
            .map_err(|e| CheckoutError::Widget(e.to_string()))?;

        session.payment = PaymentStage::AwaitingWidget;
        info!(gateway_order_id = %gateway_order_id, "payment widget opened");
        self.events
            .emit(FlowEvent::WidgetOpened { gateway_order_id });

        let timeout = self.settings.widget_timeout;
        let deadline = async move {
            match timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => future::pending::<()>().await,
            }
        };

        let result = tokio::select! {
            outcome = outcome => outcome.map_err(|_| CheckoutError::PaymentAbandoned),
            () = cancelled(&mut cancel_rx) => Err(CheckoutError::PaymentCancelled),
            () = deadline => Err(CheckoutError::PaymentTimedOut),
        };

        session.payment = match result {
            Ok(_) => PaymentStage::AwaitingConfirmation,
            Err(_) => PaymentStage::OrderCreated,
        };
        result
    }

    async fn confirm(
        &self,
        session: &mut CheckoutSession,
        result: &PaymentResult,
    ) -> Result<(), CheckoutError> {
        ensure_payable(session)?;
        let draft = session.order.as_ref().ok_or(CheckoutError::NoOrder)?;
        if draft.gateway_order_id != result.razorpay_order_id {
            warn!(
                expected = %draft.gateway_order_id,
                received = %result.razorpay_order_id,
                "widget result refers to a different gateway order"
            );
        }

        self.api
            .verify_payment(result)
            .await
            .map_err(|e| CheckoutError::from_client(e, CheckoutError::backend))?;

        session.payment = PaymentStage::Completed;
        info!(payment_id = %result.razorpay_payment_id, "payment confirmed");
        self.events.emit(FlowEvent::PaymentConfirmed {
            redirect: self.settings.redirect.clone(),
        });
        Ok(())
    }

    fn widget_options(&self, draft: &OrderDraft, prefill: Prefill) -> WidgetOptions {
        let storefront = &self.settings.storefront;
        WidgetOptions {
            key: draft.payment_key.clone(),
            amount: draft.amount,
            currency: draft.currency.clone(),
            name: storefront.name.clone(),
            description: storefront.description.clone(),
            order_id: draft.gateway_order_id.clone(),
            prefill,
            theme: storefront.theme.clone(),
        }
    }
}

/// A payment step needs a verified contact and a payment not yet confirmed.
fn ensure_payable(session: &CheckoutSession) -> Result<(), CheckoutError> {
    if !session.is_verified() {
        return Err(CheckoutError::NotVerified);
    }
    if session.payment_stage() == PaymentStage::Completed {
        return Err(CheckoutError::AlreadyPaid);
    }
    Ok(())
}

/// Resolves once the cancel flag is raised.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            future::pending::<()>().await;
        }
    }
}
