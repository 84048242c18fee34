use crate::context::ClientContext;
use crate::domain::card::{CardType, luhn_valid};
use crate::domain::nonce::{CardNonce, GooglePayCardNonce, PayPalAccountNonce, PaymentMethodNonce};
use crate::domain::ports::{PayPalInternalClient, PayPalResponse, TokenizationClient};
use crate::domain::request::{
    CardRequest, GooglePayPaymentData, PayPalAccountRequest, PayPalRequest, PaymentMethodRequest,
};
use crate::error::{ErrorWithResponse, FieldError, Result, TokenizeError};
use async_trait::async_trait;
use uuid::Uuid;

/// In-process stand-in for the gateway.
///
/// Applies the same field validation the gateway does and mints random
/// nonces. An offline gateway fails every call with a `TransportError`.
#[derive(Debug, Clone, Default)]
pub struct SandboxGateway {
    offline: bool,
}

impl SandboxGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self { offline: true }
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline {
            return Err(TokenizeError::TransportError(
                "sandbox gateway is unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenizationClient for SandboxGateway {
    async fn tokenize(
        &self,
        context: &ClientContext,
        request: PaymentMethodRequest,
    ) -> Result<PaymentMethodNonce> {
        self.ensure_online()?;
        tracing::debug!(kind = request.kind(), session = %context.session_id(), "sandbox tokenize");

        match request {
            PaymentMethodRequest::Card(card) => tokenize_card(context, &card).map(Into::into),
            PaymentMethodRequest::PayPal(account) => tokenize_paypal(&account).map(Into::into),
            PaymentMethodRequest::GooglePay(data) => tokenize_google_pay(&data).map(Into::into),
        }
    }
}

#[async_trait]
impl PayPalInternalClient for SandboxGateway {
    async fn send_request(
        &self,
        _context: &ClientContext,
        request: &PayPalRequest,
    ) -> Result<PayPalResponse> {
        self.ensure_online()?;

        let token = format!("EC-{}", Uuid::new_v4().simple().to_string().to_uppercase());
        let approval_url = match request {
            PayPalRequest::Checkout(_) => {
                format!("https://www.sandbox.paypal.com/checkoutnow?token={token}")
            }
            PayPalRequest::Vault(_) => {
                format!("https://www.sandbox.paypal.com/agreements/approve?ba_token={token}")
            }
        };
        Ok(PayPalResponse {
            approval_url,
            pairing_id: token,
            client_metadata_id: request.risk_correlation_id().map(str::to_string),
        })
    }
}

fn new_nonce(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn tokenize_card(context: &ClientContext, card: &CardRequest) -> Result<CardNonce> {
    let config = context.config();
    let mut errors = Vec::new();

    let number = card.number.trim();
    if !(12..=19).contains(&number.len()) || !luhn_valid(number) {
        errors.push(FieldError::new("number", "Credit card number is invalid"));
    }

    let month_valid = card
        .expiration_month
        .trim()
        .parse::<u8>()
        .is_ok_and(|m| (1..=12).contains(&m));
    if !month_valid {
        errors.push(FieldError::new(
            "expirationMonth",
            "Expiration month is invalid",
        ));
    }

    let year = card.expiration_year.trim();
    if !matches!(year.len(), 2 | 4) || !year.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(FieldError::new("expirationYear", "Expiration year is invalid"));
    }

    let card_type = CardType::from_number(number);
    match card.cvv.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(cvv) => {
            let expected = card_type.security_code_length();
            if cvv.len() != expected || !cvv.bytes().all(|b| b.is_ascii_digit()) {
                errors.push(FieldError::new(
                    "cvv",
                    format!("CVV must be {expected} digits"),
                ));
            }
        }
        None if config.is_cvv_challenge_present() => {
            errors.push(FieldError::new("cvv", "CVV is required"));
        }
        None => {}
    }

    let postal_missing = card.postal_code.as_deref().is_none_or(|p| p.trim().is_empty());
    if postal_missing && config.is_postal_code_challenge_present() {
        errors.push(FieldError::new("postalCode", "Postal code is required"));
    }

    if !errors.is_empty() {
        return Err(ErrorWithResponse::new(
            "Credit card is invalid",
            vec![FieldError::group("creditCard", errors)],
        )
        .into());
    }

    let last_four = number[number.len() - 4..].to_string();
    Ok(CardNonce {
        nonce: new_nonce("tokencc_sb"),
        description: format!("ending in {}", &last_four[2..]),
        is_default: false,
        card_type,
        last_two: last_four[2..].to_string(),
        last_four,
        bin: number[..6].to_string(),
    })
}

fn tokenize_paypal(account: &PayPalAccountRequest) -> Result<PayPalAccountNonce> {
    if account.order_id.trim().is_empty() {
        return Err(ErrorWithResponse::new(
            "PayPal account is invalid",
            vec![FieldError::group(
                "paypalAccount",
                vec![FieldError::new("orderId", "Order id is required")],
            )],
        )
        .into());
    }

    // The sandbox, like the gateway for native checkout, omits payer details
    let mut nonce = PayPalAccountNonce::new(new_nonce("fake-paypal-account-nonce"));
    nonce.client_metadata_id = account.client_metadata_id.clone();
    Ok(nonce)
}

fn tokenize_google_pay(data: &GooglePayPaymentData) -> Result<GooglePayCardNonce> {
    let mut errors = Vec::new();
    if data.token.trim().is_empty() {
        errors.push(FieldError::new("token", "Payment token is required"));
    }
    if data.last_four.len() != 4 || !data.last_four.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(FieldError::new("lastFour", "Last four digits are invalid"));
    }
    if !errors.is_empty() {
        return Err(ErrorWithResponse::new(
            "Google Pay card is invalid",
            vec![FieldError::group("androidPayCard", errors)],
        )
        .into());
    }

    Ok(GooglePayCardNonce {
        nonce: new_nonce("fake-android-pay-nonce"),
        description: format!("Android Pay ending in {}", &data.last_four[2..]),
        is_default: false,
        card_type: data.card_network.clone(),
        last_four: data.last_four.clone(),
        email: data.email.clone(),
    })
}
