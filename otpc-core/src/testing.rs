//! Scripted backend and widgets for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use otpc_sdk::client::{ClientError, StatusCode};
use otpc_sdk::objects::{
    Acknowledgement, CreateOrderRequest, CreateOrderResponse, PaymentResult, SendOtpRequest,
    SendOtpResponse, VerifyOtpRequest, WidgetOptions,
};

use crate::api::CheckoutApi;
use crate::payment::{PaymentWidget, WidgetCompletion, WidgetError};

/// A request the scripted backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    SendOtp(SendOtpRequest),
    VerifyOtp(VerifyOtpRequest),
    CreateOrder(CreateOrderRequest),
    VerifyPayment(PaymentResult),
}

type Script<T> = Mutex<VecDeque<Result<T, ClientError>>>;

/// Answers each endpoint from a queue of scripted results, falling back to
/// a success response once the queue is empty, and records every call.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    send_otp: Script<SendOtpResponse>,
    verify_otp: Script<Acknowledgement>,
    create_order: Script<CreateOrderResponse>,
    verify_payment: Script<Acknowledgement>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_send_otp(self, result: Result<SendOtpResponse, ClientError>) -> Self {
        self.send_otp.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_verify_otp(self, result: Result<Acknowledgement, ClientError>) -> Self {
        self.verify_otp.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_create_order(self, result: Result<CreateOrderResponse, ClientError>) -> Self {
        self.create_order.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_verify_payment(self, result: Result<Acknowledgement, ClientError>) -> Self {
        self.verify_payment.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn create_order_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateOrder(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(script: &Script<T>, fallback: impl FnOnce() -> T) -> Result<T, ClientError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Ok(fallback()))
}

#[async_trait]
impl CheckoutApi for ScriptedApi {
    async fn send_otp(&self, request: &SendOtpRequest) -> Result<SendOtpResponse, ClientError> {
        self.record(Call::SendOtp(request.clone()));
        next(&self.send_otp, SendOtpResponse::default)
    }

    async fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> Result<Acknowledgement, ClientError> {
        self.record(Call::VerifyOtp(request.clone()));
        next(&self.verify_otp, Acknowledgement::default)
    }

    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        self.record(Call::CreateOrder(request.clone()));
        next(&self.create_order, sample_order)
    }

    async fn verify_payment(
        &self,
        result: &PaymentResult,
    ) -> Result<Acknowledgement, ClientError> {
        self.record(Call::VerifyPayment(result.clone()));
        next(&self.verify_payment, Acknowledgement::default)
    }
}

pub(crate) fn backend_error(message: &str) -> ClientError {
    ClientError::Backend {
        message: message.to_string(),
    }
}

pub(crate) fn transport_error() -> ClientError {
    ClientError::Api {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: "upstream connect error".to_string(),
    }
}

pub(crate) fn sample_order() -> CreateOrderResponse {
    CreateOrderResponse {
        order_id: Some("O1".to_string()),
        key: "k1".to_string(),
        amount: 1000,
        currency: "INR".to_string(),
        razorpay_order_id: "rp_1".to_string(),
    }
}

pub(crate) fn sample_payment() -> PaymentResult {
    PaymentResult {
        razorpay_payment_id: "pay_1".to_string(),
        razorpay_order_id: "rp_1".to_string(),
        razorpay_signature: "5f2b".to_string(),
    }
}

/// How a [`ScriptedWidget`] reacts to being opened.
pub(crate) enum WidgetBehavior {
    /// Complete immediately with this result.
    Complete(PaymentResult),
    /// Close without a result.
    Close,
    /// Keep the completion and never call it.
    Hang,
    /// Fail to open.
    Fail,
}

pub(crate) struct ScriptedWidget {
    behavior: WidgetBehavior,
    opened: Mutex<Vec<WidgetOptions>>,
    held: Mutex<Vec<WidgetCompletion>>,
}

impl ScriptedWidget {
    pub(crate) fn new(behavior: WidgetBehavior) -> Self {
        Self {
            behavior,
            opened: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn opened(&self) -> Vec<WidgetOptions> {
        self.opened.lock().unwrap().clone()
    }
}

impl PaymentWidget for ScriptedWidget {
    fn open(&self, options: WidgetOptions, completion: WidgetCompletion) -> Result<(), WidgetError> {
        if matches!(self.behavior, WidgetBehavior::Fail) {
            return Err(WidgetError::new("gateway script failed to load"));
        }
        self.opened.lock().unwrap().push(options);
        match &self.behavior {
            WidgetBehavior::Complete(result) => {
                completion.complete(result.clone());
            }
            WidgetBehavior::Close => drop(completion),
            WidgetBehavior::Hang => self.held.lock().unwrap().push(completion),
            WidgetBehavior::Fail => {}
        }
        Ok(())
    }
}
