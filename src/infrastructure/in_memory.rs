use crate::context::ClientContext;
use crate::domain::nonce::PaymentMethodNonce;
use crate::domain::ports::{AnalyticsReporter, DataCollector, TokenizationClient};
use crate::domain::request::PaymentMethodRequest;
use crate::error::{Result, TokenizeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// A tokenization client that replays queued outcomes in order.
///
/// Every request it receives is recorded. When the queue is empty it fails
/// with a `TransportError`.
#[derive(Default, Clone)]
pub struct ScriptedTokenizationClient {
    outcomes: Arc<RwLock<VecDeque<Result<PaymentMethodNonce>>>>,
    requests: Arc<RwLock<Vec<PaymentMethodRequest>>>,
}

impl ScriptedTokenizationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_success(&self, nonce: PaymentMethodNonce) {
        self.outcomes.write().await.push_back(Ok(nonce));
    }

    pub async fn push_failure(&self, error: TokenizeError) {
        self.outcomes.write().await.push_back(Err(error));
    }

    pub async fn requests(&self) -> Vec<PaymentMethodRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl TokenizationClient for ScriptedTokenizationClient {
    async fn tokenize(
        &self,
        _context: &ClientContext,
        request: PaymentMethodRequest,
    ) -> Result<PaymentMethodNonce> {
        self.requests.write().await.push(request);
        self.outcomes
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(TokenizeError::TransportError(
                    "no scripted outcome left".to_string(),
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CollectorMode {
    #[default]
    Succeed,
    Fail,
    Stall,
}

/// Records the nonces it was asked to collect risk data for.
///
/// `failing()` reports an error after recording; `stalled()` records and then
/// never completes.
#[derive(Default, Clone)]
pub struct RecordingDataCollector {
    collected: Arc<RwLock<Vec<String>>>,
    mode: CollectorMode,
}

impl RecordingDataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            mode: CollectorMode::Fail,
            ..Self::default()
        }
    }

    pub fn stalled() -> Self {
        Self {
            mode: CollectorMode::Stall,
            ..Self::default()
        }
    }

    pub async fn collected(&self) -> Vec<String> {
        self.collected.read().await.clone()
    }
}

#[async_trait]
impl DataCollector for RecordingDataCollector {
    async fn collect_risk_data(
        &self,
        _context: &ClientContext,
        nonce: &PaymentMethodNonce,
    ) -> Result<()> {
        self.collected.write().await.push(nonce.nonce().to_string());
        match self.mode {
            CollectorMode::Succeed => Ok(()),
            CollectorMode::Fail => Err(TokenizeError::RiskCollectionError(
                "device data unavailable".to_string(),
            )),
            CollectorMode::Stall => std::future::pending().await,
        }
    }
}

/// Keeps every analytics event in memory, in the order it was sent.
#[derive(Default, Clone)]
pub struct RecordingAnalyticsReporter {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingAnalyticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }
}

impl AnalyticsReporter for RecordingAnalyticsReporter {
    fn send_event(&self, _context: &ClientContext, event: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.to_string());
        }
    }
}
