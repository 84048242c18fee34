use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw card fields to tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    /// Ask the gateway to verify the card against the processor.
    #[serde(default)]
    pub validate: bool,
}

impl CardRequest {
    pub fn new(
        number: impl Into<String>,
        expiration_month: impl Into<String>,
        expiration_year: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiration_month: expiration_month.into(),
            expiration_year: expiration_year.into(),
            cvv: None,
            postal_code: None,
            cardholder_name: None,
            validate: false,
        }
    }

    pub fn cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn cardholder_name(mut self, name: impl Into<String>) -> Self {
        self.cardholder_name = Some(name.into());
        self
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayPalIntent {
    #[default]
    Authorize,
    Sale,
    Order,
}

/// One-time PayPal checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalCheckoutRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub intent: PayPalIntent,
    #[serde(default)]
    pub should_offer_pay_later: bool,
    #[serde(default)]
    pub merchant_account_id: Option<String>,
    #[serde(default)]
    pub risk_correlation_id: Option<String>,
}

impl PayPalCheckoutRequest {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            currency_code: None,
            intent: PayPalIntent::default(),
            should_offer_pay_later: false,
            merchant_account_id: None,
            risk_correlation_id: None,
        }
    }
}

/// PayPal billing agreement (vaulted account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayPalVaultRequest {
    #[serde(default)]
    pub billing_agreement_description: Option<String>,
    #[serde(default)]
    pub should_offer_credit: bool,
    #[serde(default)]
    pub merchant_account_id: Option<String>,
    #[serde(default)]
    pub risk_correlation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PayPalRequest {
    Checkout(PayPalCheckoutRequest),
    Vault(PayPalVaultRequest),
}

impl PayPalRequest {
    /// Analytics segment for this flow.
    pub fn payment_type(&self) -> &'static str {
        match self {
            PayPalRequest::Checkout(_) => "single-payment",
            PayPalRequest::Vault(_) => "billing-agreement",
        }
    }

    pub fn merchant_account_id(&self) -> Option<&str> {
        match self {
            PayPalRequest::Checkout(r) => r.merchant_account_id.as_deref(),
            PayPalRequest::Vault(r) => r.merchant_account_id.as_deref(),
        }
    }

    pub fn risk_correlation_id(&self) -> Option<&str> {
        match self {
            PayPalRequest::Checkout(r) => r.risk_correlation_id.as_deref(),
            PayPalRequest::Vault(r) => r.risk_correlation_id.as_deref(),
        }
    }

    pub fn intent(&self) -> Option<PayPalIntent> {
        match self {
            PayPalRequest::Checkout(r) => Some(r.intent),
            PayPalRequest::Vault(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalBuyer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// What PayPal hands back once the buyer approves the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayPalApproval {
    pub order_id: String,
    #[serde(default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub buyer: Option<PayPalBuyer>,
    #[serde(default)]
    pub client_metadata_id: Option<String>,
}

/// Approved PayPal account ready to be exchanged for a nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalAccountRequest {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_metadata_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<PayPalIntent>,
    pub payment_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalPriceStatus {
    #[default]
    Final,
    Estimated,
    NotCurrentlyKnown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub total_price: Decimal,
    pub currency_code: String,
    #[serde(default)]
    pub total_price_status: TotalPriceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayRequest {
    pub transaction_info: TransactionInfo,
    #[serde(default)]
    pub email_required: bool,
    #[serde(default)]
    pub billing_address_required: bool,
    /// Overrides the networks from the merchant configuration when non-empty.
    #[serde(default)]
    pub allowed_card_networks: Vec<String>,
}

impl GooglePayRequest {
    pub fn new(total_price: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            transaction_info: TransactionInfo {
                total_price,
                currency_code: currency_code.into(),
                total_price_status: TotalPriceStatus::Final,
            },
            email_required: false,
            billing_address_required: false,
            allowed_card_networks: Vec::new(),
        }
    }
}

/// Payment data returned by the Google Pay sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayPaymentData {
    /// The gateway token produced by the wallet.
    pub token: String,
    pub card_network: String,
    pub last_four: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A tokenizable request, whatever the payment method.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMethodRequest {
    Card(CardRequest),
    PayPal(PayPalAccountRequest),
    GooglePay(GooglePayPaymentData),
}

impl PaymentMethodRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentMethodRequest::Card(_) => "card",
            PaymentMethodRequest::PayPal(_) => "paypal",
            PaymentMethodRequest::GooglePay(_) => "google-pay",
        }
    }
}
