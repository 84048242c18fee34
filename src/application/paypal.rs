use super::dispatch::{AnalyticsEvents, DispatchReport, TokenizeDispatcher};
use crate::context::ClientContext;
use crate::domain::nonce::PayPalAccountNonce;
use crate::domain::ports::{PayPalInternalClientRef, PayPalResponse};
use crate::domain::request::{
    PayPalAccountRequest, PayPalApproval, PayPalCheckoutRequest, PayPalRequest,
    PayPalVaultRequest, PaymentMethodRequest,
};
use crate::error::{Result, TokenizeError};
use rust_decimal::Decimal;

pub const PAYPAL_NATIVE_EVENTS: AnalyticsEvents = AnalyticsEvents {
    success: "paypal-native.tokenize.succeeded",
    failure: "paypal-native.tokenize.failed",
};

const PAYPAL_NOT_ENABLED: &str = "PayPal is not enabled. \
    See https://developer.paypal.com/braintree/docs/guides/paypal/overview for more information.";

/// Starts PayPal flows and tokenizes approved PayPal accounts.
#[derive(Clone)]
pub struct PayPalClient {
    dispatcher: TokenizeDispatcher,
    internal: PayPalInternalClientRef,
}

impl PayPalClient {
    pub fn new(dispatcher: TokenizeDispatcher, internal: PayPalInternalClientRef) -> Self {
        Self {
            dispatcher,
            internal,
        }
    }

    /// Starts a one-time payment flow. The callback receives the payment
    /// resource whose approval URL the host should open.
    pub async fn request_one_time_payment<F>(
        &self,
        context: &ClientContext,
        request: PayPalCheckoutRequest,
        callback: F,
    ) where
        F: FnOnce(Result<PayPalResponse>) + Send,
    {
        self.start_flow(context, PayPalRequest::Checkout(request), callback)
            .await
    }

    /// Starts a billing agreement (vault) flow.
    pub async fn request_billing_agreement<F>(
        &self,
        context: &ClientContext,
        request: PayPalVaultRequest,
        callback: F,
    ) where
        F: FnOnce(Result<PayPalResponse>) + Send,
    {
        self.start_flow(context, PayPalRequest::Vault(request), callback)
            .await
    }

    /// Exchanges an approved PayPal account for a nonce.
    ///
    /// The request is checked against the merchant configuration first; a
    /// rejected request reaches the callback as an error without being
    /// dispatched, and `None` is returned. Payer details missing from the
    /// gateway response are filled from the approval before the callback sees
    /// the nonce.
    pub async fn tokenize_paypal_account<F>(
        &self,
        context: &ClientContext,
        request: PayPalRequest,
        approval: PayPalApproval,
        callback: F,
    ) -> Option<DispatchReport>
    where
        F: FnOnce(Result<PayPalAccountNonce>) + Send,
    {
        let prefix = "paypal-native";
        self.dispatcher
            .send_event(context, &format!("{prefix}.tokenize.started"));
        self.send_selection_events(context, &request, prefix);

        if let Err(e) = validate_flow(context, &request) {
            tracing::warn!(error = %e, "paypal native checkout rejected");
            callback(Err(e));
            self.dispatcher
                .send_event(context, &format!("{prefix}.tokenize.invalid-request.failed"));
            return None;
        }

        let payment_type = request.payment_type();
        self.dispatcher
            .send_event(context, &format!("{prefix}.{payment_type}.started"));

        let account = setup_account(&request, &approval);
        let report = self
            .dispatcher
            .dispatch(
                context,
                PaymentMethodRequest::PayPal(account),
                PAYPAL_NATIVE_EVENTS,
                move |result: Result<PayPalAccountNonce>| {
                    callback(result.map(|nonce| setup_payer_info_if_needed(nonce, &approval)))
                },
            )
            .await;
        Some(report)
    }

    async fn start_flow<F>(
        &self,
        context: &ClientContext,
        request: PayPalRequest,
        callback: F,
    ) where
        F: FnOnce(Result<PayPalResponse>) + Send,
    {
        let prefix = "paypal";
        self.send_selection_events(context, &request, prefix);

        if let Err(e) = validate_flow(context, &request) {
            tracing::warn!(error = %e, "paypal flow rejected");
            callback(Err(e));
            self.dispatcher
                .send_event(context, &format!("{prefix}.invalid-request"));
            return;
        }

        let payment_type = request.payment_type();
        match self.internal.send_request(context, &request).await {
            Ok(response) => {
                callback(Ok(response));
                self.dispatcher
                    .send_event(context, &format!("{prefix}.{payment_type}.started"));
            }
            Err(e) => {
                tracing::warn!(error = %e, payment_type, "paypal flow failed to start");
                callback(Err(e));
                self.dispatcher
                    .send_event(context, &format!("{prefix}.{payment_type}.failed"));
            }
        }
    }

    fn send_selection_events(&self, context: &ClientContext, request: &PayPalRequest, prefix: &str) {
        let payment_type = request.payment_type();
        self.dispatcher
            .send_event(context, &format!("{prefix}.{payment_type}.selected"));

        let offered = match request {
            PayPalRequest::Checkout(r) if r.should_offer_pay_later => Some("paylater"),
            PayPalRequest::Vault(r) if r.should_offer_credit => Some("credit"),
            _ => None,
        };
        if let Some(offer) = offered {
            self.dispatcher
                .send_event(context, &format!("{prefix}.{payment_type}.{offer}.offered"));
        }
    }
}

fn validate_flow(context: &ClientContext, request: &PayPalRequest) -> Result<()> {
    if !context.config().paypal_enabled {
        return Err(TokenizeError::ConfigurationError(
            PAYPAL_NOT_ENABLED.to_string(),
        ));
    }
    if let PayPalRequest::Checkout(checkout) = request
        && checkout.amount <= Decimal::ZERO
    {
        return Err(TokenizeError::InvalidRequest(
            "A PayPal checkout amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Builds the account sent for tokenization. The request's risk correlation
/// id wins over the one PayPal returned.
pub fn setup_account(request: &PayPalRequest, approval: &PayPalApproval) -> PayPalAccountRequest {
    PayPalAccountRequest {
        order_id: approval.order_id.clone(),
        payer_id: approval.payer_id.clone(),
        client_metadata_id: request
            .risk_correlation_id()
            .map(str::to_string)
            .or_else(|| approval.client_metadata_id.clone()),
        merchant_account_id: request.merchant_account_id().map(str::to_string),
        intent: request.intent(),
        payment_type: request.payment_type().to_string(),
    }
}

/// Fills payer fields from the approval when the gateway left them empty.
pub fn setup_payer_info_if_needed(
    mut nonce: PayPalAccountNonce,
    approval: &PayPalApproval,
) -> PayPalAccountNonce {
    let missing = |field: &Option<String>| field.as_deref().is_none_or(str::is_empty);

    if missing(&nonce.payer_id) {
        nonce.payer_id = approval.payer_id.clone();
    }
    if let Some(buyer) = &approval.buyer {
        if missing(&nonce.first_name) {
            nonce.first_name = buyer.given_name.clone();
        }
        if missing(&nonce.last_name) {
            nonce.last_name = buyer.family_name.clone();
        }
        if missing(&nonce.email) {
            nonce.email = buyer.email.clone();
        }
    }
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::PayPalBuyer;
    use rust_decimal_macros::dec;

    fn approval() -> PayPalApproval {
        PayPalApproval {
            order_id: "EC-6XE6338828653824N".to_string(),
            payer_id: Some("2".to_string()),
            buyer: Some(PayPalBuyer {
                email: Some("test@test.com".to_string()),
                given_name: Some("givenNameTest".to_string()),
                family_name: Some("familyNameTest".to_string()),
            }),
            client_metadata_id: Some("sample-client-metadata-id".to_string()),
        }
    }

    #[test]
    fn test_setup_account_prefers_risk_correlation_id() {
        let mut checkout = PayPalCheckoutRequest::new(dec!(1.00));
        checkout.merchant_account_id = Some("sample-merchant-account-id".to_string());
        checkout.risk_correlation_id = Some("riskId".to_string());

        let account = setup_account(&PayPalRequest::Checkout(checkout), &approval());
        assert_eq!(account.client_metadata_id.as_deref(), Some("riskId"));
        assert_eq!(
            account.merchant_account_id.as_deref(),
            Some("sample-merchant-account-id")
        );
        assert_eq!(account.payment_type, "single-payment");
    }

    #[test]
    fn test_setup_account_falls_back_to_approval_metadata() {
        let account = setup_account(
            &PayPalRequest::Vault(PayPalVaultRequest::default()),
            &approval(),
        );
        assert_eq!(
            account.client_metadata_id.as_deref(),
            Some("sample-client-metadata-id")
        );
        assert_eq!(account.intent, None);
        assert_eq!(account.payment_type, "billing-agreement");
    }

    #[test]
    fn test_payer_info_is_set_if_missing() {
        let nonce = setup_payer_info_if_needed(
            PayPalAccountNonce::new("68a313fb-2747-10cd-1cdf-c85d49e55774"),
            &approval(),
        );
        assert_eq!(nonce.payer_id.as_deref(), Some("2"));
        assert_eq!(nonce.first_name.as_deref(), Some("givenNameTest"));
        assert_eq!(nonce.last_name.as_deref(), Some("familyNameTest"));
        assert_eq!(nonce.email.as_deref(), Some("test@test.com"));
    }

    #[test]
    fn test_payer_info_is_kept_if_present() {
        let mut nonce = PayPalAccountNonce::new("nonce");
        nonce.first_name = Some("Brian".to_string());
        nonce.email = Some(String::new());

        let nonce = setup_payer_info_if_needed(nonce, &approval());
        assert_eq!(nonce.first_name.as_deref(), Some("Brian"));
        // Empty strings count as missing
        assert_eq!(nonce.email.as_deref(), Some("test@test.com"));
    }
}
