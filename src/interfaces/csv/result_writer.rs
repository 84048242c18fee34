use crate::domain::nonce::CardNonce;
use crate::error::{Result, TokenizeError};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    row: usize,
    status: &'static str,
    nonce: &'a str,
    card_type: &'a str,
    last_four: &'a str,
    error: String,
}

/// Writes one CSV line per tokenization outcome.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, row: usize, outcome: &Result<CardNonce>) -> Result<()> {
        let record = match outcome {
            Ok(nonce) => ResultRow {
                row,
                status: "ok",
                nonce: &nonce.nonce,
                card_type: nonce.card_type.as_str(),
                last_four: &nonce.last_four,
                error: String::new(),
            },
            Err(e) => ResultRow {
                row,
                status: "failed",
                nonce: "",
                card_type: "",
                last_four: "",
                error: describe(e),
            },
        };
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

// Validation errors list the offending fields so the CSV stays readable.
fn describe(error: &TokenizeError) -> String {
    match error.as_validation() {
        Some(validation) => {
            let fields: Vec<&str> = validation
                .field_errors
                .iter()
                .flat_map(|group| group.field_errors.iter())
                .map(|f| f.field.as_str())
                .collect();
            if fields.is_empty() {
                validation.message.clone()
            } else {
                format!("{} ({})", validation.message, fields.join(" "))
            }
        }
        None => error.to_string(),
    }
}
