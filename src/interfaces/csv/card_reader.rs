use crate::domain::request::CardRequest;
use crate::error::{Result, TokenizeError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CardRow {
    number: String,
    expiration_month: String,
    expiration_year: String,
    cvv: Option<String>,
    postal_code: Option<String>,
    cardholder_name: Option<String>,
}

impl From<CardRow> for CardRequest {
    fn from(row: CardRow) -> Self {
        CardRequest {
            number: row.number,
            expiration_month: row.expiration_month,
            expiration_year: row.expiration_year,
            cvv: row.cvv,
            postal_code: row.postal_code,
            cardholder_name: row.cardholder_name,
            validate: false,
        }
    }
}

/// Reads card rows from a CSV source.
///
/// Expects a header with `number, expiration_month, expiration_year` and the
/// optional `cvv`, `postal_code`, `cardholder_name` columns. Whitespace is
/// trimmed and empty cells read as absent.
pub struct CardReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CardReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one card per row.
    pub fn cards(self) -> impl Iterator<Item = Result<CardRequest>> {
        self.reader
            .into_deserialize::<CardRow>()
            .map(|result| result.map(CardRequest::from).map_err(TokenizeError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "number, expiration_month, expiration_year, cvv, postal_code\n\
                    4111111111111111, 12, 2030, 123, 94103\n\
                    5555555555554444, 01, 2031, , ";
        let cards: Vec<Result<CardRequest>> = CardReader::new(data.as_bytes()).cards().collect();

        assert_eq!(cards.len(), 2);
        let first = cards[0].as_ref().unwrap();
        assert_eq!(first.number, "4111111111111111");
        assert_eq!(first.cvv.as_deref(), Some("123"));
        assert_eq!(first.postal_code.as_deref(), Some("94103"));

        let second = cards[1].as_ref().unwrap();
        assert!(second.cvv.is_none());
        assert!(second.postal_code.is_none());
    }

    #[test]
    fn test_reader_missing_column() {
        let data = "number, expiration_month\n4111111111111111, 12";
        let cards: Vec<Result<CardRequest>> = CardReader::new(data.as_bytes()).cards().collect();
        assert!(matches!(cards[0], Err(TokenizeError::CsvError(_))));
    }
}
