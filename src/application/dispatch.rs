use crate::context::ClientContext;
use crate::domain::invocation::{Invocation, InvocationState};
use crate::domain::nonce::{PaymentMethodNonce, TypedNonce};
use crate::domain::ports::{AnalyticsReporterRef, DataCollectorRef, TokenizationClientRef};
use crate::domain::request::PaymentMethodRequest;
use crate::error::Result;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Analytics event names reported for each outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsEvents {
    pub success: &'static str,
    pub failure: &'static str,
}

/// What happened during one dispatch, handed back to the caller of the
/// dispatcher (not to the terminal callback).
#[derive(Debug)]
pub struct DispatchReport {
    pub invocation_id: Uuid,
    pub state: InvocationState,
    pub event: &'static str,
    pub succeeded: bool,
    /// Handle of the spawned risk collection. Present only on success, and
    /// only when dispatched from within a Tokio runtime. Dropping it does not
    /// cancel the task.
    pub risk_task: Option<JoinHandle<()>>,
}

/// Shared dispatch core behind every payment-method client.
///
/// For each call it submits the request to the [`TokenizationClient`], then on
/// success spawns risk collection, invokes the terminal callback, and reports
/// the success event. On failure it invokes the callback and reports the
/// failure event. The callback runs exactly once, before the analytics event.
///
/// [`TokenizationClient`]: crate::domain::ports::TokenizationClient
#[derive(Clone)]
pub struct TokenizeDispatcher {
    tokenization: TokenizationClientRef,
    data_collector: DataCollectorRef,
    analytics: AnalyticsReporterRef,
}

impl TokenizeDispatcher {
    pub fn new(
        tokenization: TokenizationClientRef,
        data_collector: DataCollectorRef,
        analytics: AnalyticsReporterRef,
    ) -> Self {
        Self {
            tokenization,
            data_collector,
            analytics,
        }
    }

    /// Reports an event outside of the outcome pair (flow selection, offers).
    pub fn send_event(&self, context: &ClientContext, event: &str) {
        self.analytics.send_event(context, event);
    }

    pub async fn dispatch<N, F>(
        &self,
        context: &ClientContext,
        request: PaymentMethodRequest,
        events: AnalyticsEvents,
        callback: F,
    ) -> DispatchReport
    where
        N: TypedNonce,
        F: FnOnce(Result<N>) + Send,
    {
        let mut invocation = Invocation::new(request.kind());
        advance(&mut invocation, InvocationState::Dispatched);

        let outcome = self
            .tokenization
            .tokenize(context, request)
            .await
            .and_then(|nonce| {
                let typed = N::try_from(nonce.clone())?;
                Ok((nonce, typed))
            });

        match outcome {
            Ok((nonce, typed)) => {
                advance(&mut invocation, InvocationState::Succeeded);
                info!(invocation = %invocation.id, kind = invocation.kind, "nonce received");

                let risk_task = self.spawn_risk_collection(context, nonce);
                callback(Ok(typed));
                self.analytics.send_event(context, events.success);

                advance(&mut invocation, InvocationState::Reported);
                DispatchReport {
                    invocation_id: invocation.id,
                    state: invocation.state(),
                    event: events.success,
                    succeeded: true,
                    risk_task,
                }
            }
            Err(e) => {
                advance(&mut invocation, InvocationState::Failed);
                warn!(invocation = %invocation.id, kind = invocation.kind, error = %e, "tokenization failed");

                callback(Err(e));
                self.analytics.send_event(context, events.failure);

                advance(&mut invocation, InvocationState::Reported);
                DispatchReport {
                    invocation_id: invocation.id,
                    state: invocation.state(),
                    event: events.failure,
                    succeeded: false,
                    risk_task: None,
                }
            }
        }
    }

    /// Runs [`dispatch`](Self::dispatch) on its own task so the caller is not
    /// held up by the network exchange.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn dispatch_detached<N, F>(
        &self,
        context: ClientContext,
        request: PaymentMethodRequest,
        events: AnalyticsEvents,
        callback: F,
    ) -> JoinHandle<DispatchReport>
    where
        N: TypedNonce,
        F: FnOnce(Result<N>) + Send + 'static,
    {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher
                .dispatch(&context, request, events, callback)
                .await
        })
    }

    // Failures are logged and dropped; they never reach the terminal callback.
    // Without a Tokio runtime collection is skipped.
    fn spawn_risk_collection(
        &self,
        context: &ClientContext,
        nonce: PaymentMethodNonce,
    ) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(session = %context.session_id(), error = %e, "no tokio runtime, risk data collection skipped");
                return None;
            }
        };

        let collector = Arc::clone(&self.data_collector);
        let context = context.clone();
        Some(runtime.spawn(async move {
            if let Err(e) = collector.collect_risk_data(&context, &nonce).await {
                warn!(session = %context.session_id(), error = %e, "risk data collection failed");
            }
        }))
    }
}

fn advance(invocation: &mut Invocation, next: InvocationState) {
    if let Err(e) = invocation.advance(next) {
        error!(invocation = %invocation.id, error = %e, "invocation state violated");
    }
}
