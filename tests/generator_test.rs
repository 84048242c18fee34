mod common;

use payment_tokenizer::application::card::CardClient;
use payment_tokenizer::application::dispatch::TokenizeDispatcher;
use payment_tokenizer::domain::card::{CardType, luhn_valid};
use payment_tokenizer::infrastructure::in_memory::{
    RecordingAnalyticsReporter, RecordingDataCollector,
};
use payment_tokenizer::infrastructure::sandbox::SandboxGateway;
use payment_tokenizer::interfaces::csv::card_reader::CardReader;
use std::fs::File;
use std::sync::Arc;

#[test]
fn test_generated_numbers_are_luhn_valid() {
    for _ in 0..100 {
        let visa = common::card_number("4", 16);
        assert_eq!(visa.len(), 16);
        assert!(luhn_valid(&visa), "{visa} should pass the checksum");
        assert_eq!(CardType::from_number(&visa), CardType::Visa);

        let amex = common::card_number("37", 15);
        assert!(luhn_valid(&amex), "{amex} should pass the checksum");
        assert_eq!(CardType::from_number(&amex), CardType::AmericanExpress);
    }
}

#[tokio::test]
async fn test_generated_csv_tokenizes_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generated_cards.csv");
    common::generate_cards_csv(&path, 50).expect("Failed to generate CSV");

    let content = std::fs::read_to_string(&path).expect("Failed to read file");
    // Header + 50 rows
    assert_eq!(content.lines().count(), 51);

    let analytics = RecordingAnalyticsReporter::new();
    let collector = RecordingDataCollector::new();
    let client = CardClient::new(TokenizeDispatcher::new(
        Arc::new(SandboxGateway::new()),
        Arc::new(collector.clone()),
        Arc::new(analytics.clone()),
    ));
    let context = common::context();

    let mut risk_tasks = Vec::new();
    for card in CardReader::new(File::open(&path).unwrap()).cards() {
        let mut outcome = None;
        let report = client
            .tokenize(&context, card.unwrap(), |result| outcome = Some(result))
            .await;
        assert!(outcome.unwrap().is_ok());
        risk_tasks.extend(report.risk_task);
    }

    for task in risk_tasks {
        task.await.unwrap();
    }
    assert_eq!(analytics.count("card.nonce-received"), 50);
    assert_eq!(collector.collected().await.len(), 50);
}
