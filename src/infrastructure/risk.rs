use crate::context::ClientContext;
use crate::domain::nonce::PaymentMethodNonce;
use crate::domain::ports::DataCollector;
use crate::error::{Result, TokenizeError};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Device data submitted alongside a nonce for fraud scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceData {
    pub correlation_id: String,
    pub device_session_id: String,
    pub merchant_id: String,
    pub nonce: String,
    pub payment_method: &'static str,
}

impl DeviceData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builds [`DeviceData`] for each nonce and hands it to a submission queue.
#[derive(Debug, Clone)]
pub struct RiskDataCollector {
    submissions: mpsc::Sender<DeviceData>,
}

impl RiskDataCollector {
    /// Creates a collector and the receiving end of its submission queue.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DeviceData>) {
        let (submissions, rx) = mpsc::channel(capacity);
        (Self { submissions }, rx)
    }
}

#[async_trait]
impl DataCollector for RiskDataCollector {
    async fn collect_risk_data(
        &self,
        context: &ClientContext,
        nonce: &PaymentMethodNonce,
    ) -> Result<()> {
        let correlation_id = match nonce {
            PaymentMethodNonce::PayPal(paypal) => paypal.client_metadata_id.clone(),
            _ => None,
        }
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let data = DeviceData {
            correlation_id,
            device_session_id: context.session_id().simple().to_string(),
            merchant_id: context.config().merchant_id.clone(),
            nonce: nonce.nonce().to_string(),
            payment_method: nonce.kind(),
        };

        self.submissions
            .send(data)
            .await
            .map_err(|_| TokenizeError::RiskCollectionError("submission queue closed".to_string()))
    }
}
