mod common;

use payment_tokenizer::application::card::CardClient;
use payment_tokenizer::application::dispatch::TokenizeDispatcher;
use payment_tokenizer::domain::nonce::CardNonce;
use payment_tokenizer::domain::ports::{
    AnalyticsReporterRef, DataCollectorRef, PayPalInternalClient, PayPalInternalClientRef,
    TokenizationClient, TokenizationClientRef,
};
use payment_tokenizer::domain::request::{
    CardRequest, PayPalRequest, PayPalVaultRequest, PaymentMethodRequest,
};
use payment_tokenizer::infrastructure::in_memory::{
    RecordingAnalyticsReporter, RecordingDataCollector, ScriptedTokenizationClient,
};
use payment_tokenizer::infrastructure::sandbox::SandboxGateway;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let tokenization: TokenizationClientRef = Arc::new(SandboxGateway::new());
    let internal: PayPalInternalClientRef = Arc::new(SandboxGateway::new());
    let context = common::context();

    // Verify Send + Sync by spawning tasks
    let card_context = context.clone();
    let card_handle = tokio::spawn(async move {
        tokenization
            .tokenize(
                &card_context,
                PaymentMethodRequest::Card(CardRequest::new("4111111111111111", "12", "2030")),
            )
            .await
            .unwrap()
    });

    let paypal_handle = tokio::spawn(async move {
        internal
            .send_request(&context, &PayPalRequest::Vault(PayPalVaultRequest::default()))
            .await
            .unwrap()
    });

    assert_eq!(card_handle.await.unwrap().kind(), "card");
    assert!(paypal_handle.await.unwrap().approval_url.contains("ba_token="));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_invocations_are_independent() {
    let tokenization = ScriptedTokenizationClient::new();
    for i in 0..32 {
        tokenization
            .push_success(CardNonce::new(format!("nonce-{i}")).into())
            .await;
    }
    let collector = RecordingDataCollector::new();
    let analytics = RecordingAnalyticsReporter::new();

    let tokenization_ref: TokenizationClientRef = Arc::new(tokenization);
    let collector_ref: DataCollectorRef = Arc::new(collector.clone());
    let analytics_ref: AnalyticsReporterRef = Arc::new(analytics.clone());
    let client = CardClient::new(TokenizeDispatcher::new(
        tokenization_ref,
        collector_ref,
        analytics_ref,
    ));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let client = client.clone();
        let context = common::context();
        handles.push(tokio::spawn(async move {
            let mut nonce = None;
            let report = client
                .tokenize(
                    &context,
                    CardRequest::new("4111111111111111", "12", "2030"),
                    |result| nonce = result.ok().map(|n| n.nonce),
                )
                .await;
            if let Some(task) = report.risk_task {
                task.await.unwrap();
            }
            (report.invocation_id, nonce)
        }));
    }

    let mut invocation_ids = HashSet::new();
    let mut nonces = HashSet::new();
    for handle in handles {
        let (id, nonce) = handle.await.unwrap();
        invocation_ids.insert(id);
        nonces.insert(nonce.unwrap());
    }

    assert_eq!(invocation_ids.len(), 32);
    assert_eq!(nonces.len(), 32);
    assert_eq!(analytics.count("card.nonce-received"), 32);
    assert_eq!(collector.collected().await.len(), 32);
}
