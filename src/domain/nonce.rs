use super::card::CardType;
use crate::error::TokenizeError;
use serde::{Deserialize, Serialize};

/// Tokenized card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardNonce {
    pub nonce: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub card_type: CardType,
    #[serde(default)]
    pub last_two: String,
    #[serde(default)]
    pub last_four: String,
    #[serde(default)]
    pub bin: String,
}

impl CardNonce {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            description: String::new(),
            is_default: false,
            card_type: CardType::Unknown,
            last_two: String::new(),
            last_four: String::new(),
            bin: String::new(),
        }
    }
}

/// Tokenized PayPal account. Payer fields may be missing in the gateway
/// response and get filled from the approval afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalAccountNonce {
    pub nonce: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub client_metadata_id: Option<String>,
}

impl PayPalAccountNonce {
    pub fn new(nonce: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            description: "PayPal".to_string(),
            is_default: false,
            email: None,
            payer_id: None,
            first_name: None,
            last_name: None,
            client_metadata_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayCardNonce {
    pub nonce: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub card_type: String,
    #[serde(default)]
    pub last_four: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a successful tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodNonce {
    Card(CardNonce),
    PayPal(PayPalAccountNonce),
    GooglePay(GooglePayCardNonce),
}

impl PaymentMethodNonce {
    pub fn nonce(&self) -> &str {
        match self {
            PaymentMethodNonce::Card(n) => &n.nonce,
            PaymentMethodNonce::PayPal(n) => &n.nonce,
            PaymentMethodNonce::GooglePay(n) => &n.nonce,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PaymentMethodNonce::Card(_) => CardNonce::KIND,
            PaymentMethodNonce::PayPal(_) => PayPalAccountNonce::KIND,
            PaymentMethodNonce::GooglePay(_) => GooglePayCardNonce::KIND,
        }
    }
}

/// A concrete nonce type a payment-method client hands to its caller.
pub trait TypedNonce: TryFrom<PaymentMethodNonce, Error = TokenizeError> + Send + 'static {
    const KIND: &'static str;
}

macro_rules! typed_nonce {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl TypedNonce for $ty {
            const KIND: &'static str = $kind;
        }

        impl TryFrom<PaymentMethodNonce> for $ty {
            type Error = TokenizeError;

            fn try_from(nonce: PaymentMethodNonce) -> Result<Self, Self::Error> {
                match nonce {
                    PaymentMethodNonce::$variant(inner) => Ok(inner),
                    other => Err(TokenizeError::UnexpectedNonce {
                        expected: $kind,
                        actual: other.kind(),
                    }),
                }
            }
        }

        impl From<$ty> for PaymentMethodNonce {
            fn from(nonce: $ty) -> Self {
                PaymentMethodNonce::$variant(nonce)
            }
        }
    };
}

typed_nonce!(CardNonce, Card, "card");
typed_nonce!(PayPalAccountNonce, PayPal, "paypal");
typed_nonce!(GooglePayCardNonce, GooglePay, "google-pay");
