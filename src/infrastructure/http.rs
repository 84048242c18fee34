use crate::config::Authorization;
use crate::context::ClientContext;
use crate::domain::card::CardType;
use crate::domain::nonce::{CardNonce, GooglePayCardNonce, PayPalAccountNonce, PaymentMethodNonce};
use crate::domain::ports::TokenizationClient;
use crate::domain::request::PaymentMethodRequest;
use crate::error::{ErrorWithResponse, Result, TokenizeError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const CLIENT_KEY_HEADER: &str = "Client-Key";

/// Tokenizes against the gateway's client API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTokenizationClient {
    http: Client,
    base_url: Option<String>,
}

impl HttpTokenizationClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: None,
        })
    }

    /// Overrides the client API URL from the merchant configuration.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[async_trait]
impl TokenizationClient for HttpTokenizationClient {
    async fn tokenize(
        &self,
        context: &ClientContext,
        request: PaymentMethodRequest,
    ) -> Result<PaymentMethodNonce> {
        let kind = ResponseKind::of(&request);
        let base = self
            .base_url
            .as_deref()
            .unwrap_or(context.config().client_api_url.as_str())
            .trim_end_matches('/');
        let url = format!("{base}/v1/payment_methods/{}", kind.path());
        let body = request_body(context, &request)?;

        debug!(%url, kind = request.kind(), "posting tokenization request");
        let mut builder = self.http.post(&url).json(&body);
        if let Authorization::TokenizationKey { key, .. } = context.authorization() {
            builder = builder.header(CLIENT_KEY_HEADER, key);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        parse_response(kind, status, &text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Card,
    PayPal,
    GooglePay,
}

impl ResponseKind {
    pub fn of(request: &PaymentMethodRequest) -> Self {
        match request {
            PaymentMethodRequest::Card(_) => ResponseKind::Card,
            PaymentMethodRequest::PayPal(_) => ResponseKind::PayPal,
            PaymentMethodRequest::GooglePay(_) => ResponseKind::GooglePay,
        }
    }

    fn path(&self) -> &'static str {
        match self {
            ResponseKind::Card => "credit_cards",
            ResponseKind::PayPal => "paypal_accounts",
            ResponseKind::GooglePay => "android_pay_cards",
        }
    }
}

/// Builds the JSON body for a tokenization call, including session metadata
/// and the authorization fingerprint when a client token is in use.
pub fn request_body(context: &ClientContext, request: &PaymentMethodRequest) -> Result<Value> {
    let mut body = match request {
        PaymentMethodRequest::Card(card) => {
            let mut credit_card = json!({
                "number": card.number,
                "expirationMonth": card.expiration_month,
                "expirationYear": card.expiration_year,
                "options": {"validate": card.validate},
            });
            if let Some(cvv) = &card.cvv {
                credit_card["cvv"] = json!(cvv);
            }
            if let Some(name) = &card.cardholder_name {
                credit_card["cardholderName"] = json!(name);
            }
            if let Some(postal_code) = &card.postal_code {
                credit_card["billingAddress"] = json!({"postalCode": postal_code});
            }
            json!({"creditCard": credit_card})
        }
        PaymentMethodRequest::PayPal(account) => {
            let mut body = json!({"paypalAccount": serde_json::to_value(account)?});
            if let Some(id) = &account.merchant_account_id {
                body["merchantAccountId"] = json!(id);
            }
            body
        }
        PaymentMethodRequest::GooglePay(data) => {
            json!({"androidPayCard": serde_json::to_value(data)?})
        }
    };

    body["_meta"] = json!({
        "sessionId": context.session_id().to_string(),
        "integration": context.integration().as_str(),
        "source": "client",
        "platform": "rust",
    });
    if let Authorization::ClientToken {
        authorization_fingerprint,
    } = context.authorization()
    {
        body["authorizationFingerprint"] = json!(authorization_fingerprint);
    }
    Ok(body)
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CardDetails {
    #[serde(default)]
    card_type: CardType,
    #[serde(default)]
    last_two: String,
    #[serde(default)]
    last_four: String,
    #[serde(default)]
    bin: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PayerInfo {
    #[serde(default)]
    payer_id: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PayPalDetails {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    correlation_id: Option<String>,
    #[serde(default)]
    payer_info: PayerInfo,
}

#[derive(Deserialize)]
struct GatewayPaymentMethod<D> {
    nonce: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "default")]
    is_default: bool,
    #[serde(default)]
    details: Option<D>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardEnvelope {
    credit_cards: Vec<GatewayPaymentMethod<CardDetails>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayPalEnvelope {
    paypal_accounts: Vec<GatewayPaymentMethod<PayPalDetails>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GooglePayEnvelope {
    android_pay_cards: Vec<GatewayPaymentMethod<CardDetails>>,
}

fn first<D>(methods: Vec<GatewayPaymentMethod<D>>) -> Result<GatewayPaymentMethod<D>> {
    methods.into_iter().next().ok_or_else(|| {
        TokenizeError::TransportError("gateway response contained no payment method".to_string())
    })
}

/// Maps a gateway response to a nonce or to the matching error.
pub fn parse_response(kind: ResponseKind, status: u16, body: &str) -> Result<PaymentMethodNonce> {
    if status == ErrorWithResponse::UNPROCESSABLE_ENTITY {
        return match ErrorWithResponse::from_json(status, body) {
            Ok(error) => Err(error.into()),
            Err(_) => Err(TokenizeError::TransportError(format!(
                "gateway returned {status} with an unreadable body"
            ))),
        };
    }
    if !(200..300).contains(&status) {
        return Err(TokenizeError::TransportError(format!(
            "gateway returned {status}: {body}"
        )));
    }

    let malformed = |e: serde_json::Error| {
        TokenizeError::TransportError(format!("malformed gateway response: {e}"))
    };

    let nonce = match kind {
        ResponseKind::Card => {
            let envelope: CardEnvelope = serde_json::from_str(body).map_err(malformed)?;
            let method = first(envelope.credit_cards)?;
            let details = method.details.unwrap_or_default();
            PaymentMethodNonce::Card(CardNonce {
                nonce: method.nonce,
                description: method.description,
                is_default: method.is_default,
                card_type: details.card_type,
                last_two: details.last_two,
                last_four: details.last_four,
                bin: details.bin,
            })
        }
        ResponseKind::PayPal => {
            let envelope: PayPalEnvelope = serde_json::from_str(body).map_err(malformed)?;
            let method = first(envelope.paypal_accounts)?;
            let details = method.details.unwrap_or_default();
            PaymentMethodNonce::PayPal(PayPalAccountNonce {
                nonce: method.nonce,
                description: method.description,
                is_default: method.is_default,
                email: details.email.or(details.payer_info.email),
                payer_id: details.payer_info.payer_id,
                first_name: details.payer_info.first_name,
                last_name: details.payer_info.last_name,
                client_metadata_id: details.correlation_id,
            })
        }
        ResponseKind::GooglePay => {
            let envelope: GooglePayEnvelope = serde_json::from_str(body).map_err(malformed)?;
            let method = first(envelope.android_pay_cards)?;
            let details = method.details.unwrap_or_default();
            PaymentMethodNonce::GooglePay(GooglePayCardNonce {
                nonce: method.nonce,
                description: method.description,
                is_default: method.is_default,
                card_type: details.card_type.as_str().to_string(),
                last_four: details.last_four,
                email: None,
            })
        }
    };
    Ok(nonce)
}
