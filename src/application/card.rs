use super::dispatch::{AnalyticsEvents, DispatchReport, TokenizeDispatcher};
use crate::context::ClientContext;
use crate::domain::nonce::CardNonce;
use crate::domain::request::{CardRequest, PaymentMethodRequest};
use crate::error::Result;
use tokio::task::JoinHandle;

pub const CARD_EVENTS: AnalyticsEvents = AnalyticsEvents {
    success: "card.nonce-received",
    failure: "card.nonce-failed",
};

/// Tokenizes credit and debit cards.
///
/// On success the callback receives a [`CardNonce`]. A card that fails gateway
/// validation produces [`TokenizeError::ValidationError`] carrying the
/// field-level errors; network and server problems produce
/// [`TokenizeError::TransportError`].
///
/// [`TokenizeError::ValidationError`]: crate::error::TokenizeError::ValidationError
/// [`TokenizeError::TransportError`]: crate::error::TokenizeError::TransportError
#[derive(Clone)]
pub struct CardClient {
    dispatcher: TokenizeDispatcher,
}

impl CardClient {
    pub fn new(dispatcher: TokenizeDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn tokenize<F>(
        &self,
        context: &ClientContext,
        card: CardRequest,
        callback: F,
    ) -> DispatchReport
    where
        F: FnOnce(Result<CardNonce>) + Send,
    {
        self.dispatcher
            .dispatch(context, PaymentMethodRequest::Card(card), CARD_EVENTS, callback)
            .await
    }

    pub fn tokenize_detached<F>(
        &self,
        context: ClientContext,
        card: CardRequest,
        callback: F,
    ) -> JoinHandle<DispatchReport>
    where
        F: FnOnce(Result<CardNonce>) + Send + 'static,
    {
        self.dispatcher.dispatch_detached(
            context,
            PaymentMethodRequest::Card(card),
            CARD_EVENTS,
            callback,
        )
    }
}
