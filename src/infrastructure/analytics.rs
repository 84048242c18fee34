use crate::context::ClientContext;
use crate::domain::ports::AnalyticsReporter;

/// Emits analytics events as structured `info` records on the
/// `payment_tokenizer::analytics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalyticsReporter;

impl AnalyticsReporter for TracingAnalyticsReporter {
    fn send_event(&self, context: &ClientContext, event: &str) {
        tracing::info!(
            target: "payment_tokenizer::analytics",
            event,
            session = %context.session_id(),
            integration = context.integration().as_str(),
            merchant = %context.config().merchant_id,
            "analytics event"
        );
    }
}
