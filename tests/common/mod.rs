#![allow(dead_code)]

use payment_tokenizer::application::dispatch::TokenizeDispatcher;
use payment_tokenizer::config::{Authorization, ClientConfig};
use payment_tokenizer::context::ClientContext;
use payment_tokenizer::infrastructure::in_memory::{
    RecordingAnalyticsReporter, RecordingDataCollector, ScriptedTokenizationClient,
};
use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;

/// Scripted ports wired into a dispatcher, kept around for inspection.
pub struct Harness {
    pub tokenization: ScriptedTokenizationClient,
    pub collector: RecordingDataCollector,
    pub analytics: RecordingAnalyticsReporter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_collector(RecordingDataCollector::new())
    }

    pub fn with_collector(collector: RecordingDataCollector) -> Self {
        Self {
            tokenization: ScriptedTokenizationClient::new(),
            collector,
            analytics: RecordingAnalyticsReporter::new(),
        }
    }

    pub fn dispatcher(&self) -> TokenizeDispatcher {
        TokenizeDispatcher::new(
            Arc::new(self.tokenization.clone()),
            Arc::new(self.collector.clone()),
            Arc::new(self.analytics.clone()),
        )
    }
}

pub fn context() -> ClientContext {
    context_with(ClientConfig::sandbox("integration_merchant_id"))
}

pub fn context_with(config: ClientConfig) -> ClientContext {
    ClientContext::new(
        config,
        Authorization::parse("sandbox_tmxhyf7d_integration_merchant_id").unwrap(),
    )
}

/// Random Luhn-valid card number with the given prefix and length.
pub fn card_number(prefix: &str, len: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut digits: Vec<u32> = prefix.chars().filter_map(|c| c.to_digit(10)).collect();
    while digits.len() < len - 1 {
        digits.push(rng.gen_range(0..10));
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    digits.push((10 - sum % 10) % 10);

    digits
        .into_iter()
        .filter_map(|d| char::from_digit(d, 10))
        .collect()
}

pub fn generate_cards_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["number", "expiration_month", "expiration_year", "cvv", "postal_code"])?;

    for _ in 0..rows {
        wtr.write_record([card_number("4", 16).as_str(), "12", "2030", "123", "94103"])?;
    }

    wtr.flush()?;
    Ok(())
}
