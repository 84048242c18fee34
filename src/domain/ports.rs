use super::nonce::PaymentMethodNonce;
use super::request::{PaymentMethodRequest, PayPalRequest};
use crate::context::ClientContext;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Exchanges a payment-method request for a nonce with the gateway.
#[async_trait]
pub trait TokenizationClient: Send + Sync {
    async fn tokenize(
        &self,
        context: &ClientContext,
        request: PaymentMethodRequest,
    ) -> Result<PaymentMethodNonce>;
}

/// Gathers device risk data for a freshly issued nonce.
#[async_trait]
pub trait DataCollector: Send + Sync {
    async fn collect_risk_data(
        &self,
        context: &ClientContext,
        nonce: &PaymentMethodNonce,
    ) -> Result<()>;
}

/// Records analytics events. Must not block.
pub trait AnalyticsReporter: Send + Sync {
    fn send_event(&self, context: &ClientContext, event: &str);
}

/// Payment resource created when a PayPal flow starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalResponse {
    pub approval_url: String,
    pub pairing_id: String,
    #[serde(default)]
    pub client_metadata_id: Option<String>,
}

/// Creates PayPal payment resources for the browser/app-switch flow.
#[async_trait]
pub trait PayPalInternalClient: Send + Sync {
    async fn send_request(
        &self,
        context: &ClientContext,
        request: &PayPalRequest,
    ) -> Result<PayPalResponse>;
}

pub type TokenizationClientRef = Arc<dyn TokenizationClient>;
pub type DataCollectorRef = Arc<dyn DataCollector>;
pub type AnalyticsReporterRef = Arc<dyn AnalyticsReporter>;
pub type PayPalInternalClientRef = Arc<dyn PayPalInternalClient>;
