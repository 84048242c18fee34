use super::dispatch::{AnalyticsEvents, DispatchReport, TokenizeDispatcher};
use crate::config::{Authorization, Environment};
use crate::context::ClientContext;
use crate::domain::nonce::GooglePayCardNonce;
use crate::domain::request::{GooglePayPaymentData, GooglePayRequest, PaymentMethodRequest};
use crate::error::{Result, TokenizeError};
use rust_decimal::Decimal;
use serde_json::{Value, json};

pub const GOOGLE_PAY_EVENTS: AnalyticsEvents = AnalyticsEvents {
    success: "google-payment.nonce-received",
    failure: "google-payment.failed",
};

const GOOGLE_PAY_NOT_ENABLED: &str = "Google Pay is not enabled for your merchant account. \
    Enable it in the control panel and try again.";

/// Starts Google Pay and tokenizes the payment data it returns.
#[derive(Clone)]
pub struct GooglePayClient {
    dispatcher: TokenizeDispatcher,
}

impl GooglePayClient {
    pub fn new(dispatcher: TokenizeDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Validates the request against the merchant configuration and hands the
    /// wallet payment-data request to the callback. `Ok` means the payment
    /// sheet can be shown.
    pub fn request_payment<F>(&self, context: &ClientContext, request: &GooglePayRequest, callback: F)
    where
        F: FnOnce(Result<Value>),
    {
        self.dispatcher.send_event(context, "google-payment.selected");

        match payment_data_request(context, request) {
            Ok(data_request) => {
                callback(Ok(data_request));
                self.dispatcher.send_event(context, "google-payment.started");
            }
            Err(e) => {
                tracing::warn!(error = %e, "google pay request rejected");
                callback(Err(e));
                self.dispatcher.send_event(context, GOOGLE_PAY_EVENTS.failure);
            }
        }
    }

    pub async fn tokenize<F>(
        &self,
        context: &ClientContext,
        payment_data: GooglePayPaymentData,
        callback: F,
    ) -> DispatchReport
    where
        F: FnOnce(Result<GooglePayCardNonce>) + Send,
    {
        self.dispatcher
            .dispatch(
                context,
                PaymentMethodRequest::GooglePay(payment_data),
                GOOGLE_PAY_EVENTS,
                callback,
            )
            .await
    }
}

/// Builds the Google Pay `PaymentDataRequest` (API version 2) for a
/// gateway-tokenized card payment.
pub fn payment_data_request(context: &ClientContext, request: &GooglePayRequest) -> Result<Value> {
    let config = context.config();
    if !config.google_pay.enabled {
        return Err(TokenizeError::ConfigurationError(
            GOOGLE_PAY_NOT_ENABLED.to_string(),
        ));
    }

    let info = &request.transaction_info;
    if info.currency_code.len() != 3 || !info.currency_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TokenizeError::InvalidRequest(format!(
            "Invalid currency code: {}",
            info.currency_code
        )));
    }
    if info.total_price < Decimal::ZERO {
        return Err(TokenizeError::InvalidRequest(
            "Total price must not be negative".to_string(),
        ));
    }

    let networks: Vec<String> = if request.allowed_card_networks.is_empty() {
        config.google_pay.supported_networks.clone()
    } else {
        request.allowed_card_networks.clone()
    };
    let networks: Vec<String> = networks.iter().map(|n| n.to_uppercase()).collect();
    if networks.is_empty() {
        return Err(TokenizeError::ConfigurationError(
            "No card networks are supported for Google Pay".to_string(),
        ));
    }

    let environment = match config.environment {
        Environment::Production => "PRODUCTION",
        _ => "TEST",
    };

    let mut gateway = json!({
        "gateway": "braintree",
        "braintree:merchantId": config.merchant_id,
        "braintree:apiVersion": "v1",
        "braintree:sdkVersion": env!("CARGO_PKG_VERSION"),
    });
    match context.authorization() {
        Authorization::TokenizationKey { key, .. } => {
            gateway["braintree:clientKey"] = json!(key);
        }
        Authorization::ClientToken {
            authorization_fingerprint,
        } => {
            gateway["braintree:authorizationFingerprint"] = json!(authorization_fingerprint);
        }
    }

    Ok(json!({
        "apiVersion": 2,
        "apiVersionMinor": 0,
        "allowedPaymentMethods": [{
            "type": "CARD",
            "parameters": {
                "allowedAuthMethods": ["PAN_ONLY", "CRYPTOGRAM_3DS"],
                "allowedCardNetworks": networks,
                "billingAddressRequired": request.billing_address_required,
            },
            "tokenizationSpecification": {
                "type": "PAYMENT_GATEWAY",
                "parameters": gateway,
            },
        }],
        "transactionInfo": {
            "totalPrice": format!("{:.2}", info.total_price),
            "totalPriceStatus": info.total_price_status,
            "currencyCode": info.currency_code.to_uppercase(),
        },
        "emailRequired": request.email_required,
        "environment": environment,
    }))
}
