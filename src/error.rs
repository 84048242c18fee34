use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::invocation::InvocationState;

pub type Result<T> = std::result::Result<T, TokenizeError>;

#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("Validation error: {0}")]
    ValidationError(ErrorWithResponse),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unexpected nonce: expected {expected}, got {actual}")]
    UnexpectedNonce {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Invalid invocation transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: InvocationState,
        to: InvocationState,
    },
    #[error("Risk data collection failed: {0}")]
    RiskCollectionError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<ErrorWithResponse> for TokenizeError {
    fn from(error: ErrorWithResponse) -> Self {
        TokenizeError::ValidationError(error)
    }
}

impl From<reqwest::Error> for TokenizeError {
    fn from(err: reqwest::Error) -> Self {
        TokenizeError::TransportError(err.to_string())
    }
}

impl TokenizeError {
    /// Returns the structured gateway error when this is a validation failure.
    pub fn as_validation(&self) -> Option<&ErrorWithResponse> {
        match self {
            TokenizeError::ValidationError(error) => Some(error),
            _ => None,
        }
    }
}

/// A single field error reported by the gateway. Field errors nest: the
/// top level names the resource (`creditCard`) and its children name fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: Some(message.into()),
            field_errors: Vec::new(),
        }
    }

    pub fn group(field: impl Into<String>, field_errors: Vec<FieldError>) -> Self {
        Self {
            field: field.into(),
            message: None,
            field_errors,
        }
    }

    /// Depth-first lookup of a field by name.
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        if self.field == field {
            return Some(self);
        }
        self.field_errors.iter().find_map(|e| e.error_for(field))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewayErrorBody {
    error: GatewayErrorMessage,
    #[serde(default)]
    field_errors: Vec<FieldError>,
}

#[derive(Deserialize)]
struct GatewayErrorMessage {
    message: String,
}

/// A structured validation failure returned by the gateway (HTTP 422).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ErrorWithResponse {
    pub status_code: u16,
    pub message: String,
    pub field_errors: Vec<FieldError>,
    pub original_response: String,
}

impl ErrorWithResponse {
    pub const UNPROCESSABLE_ENTITY: u16 = 422;

    pub fn new(message: impl Into<String>, field_errors: Vec<FieldError>) -> Self {
        Self {
            status_code: Self::UNPROCESSABLE_ENTITY,
            message: message.into(),
            field_errors,
            original_response: String::new(),
        }
    }

    /// Parses the gateway's error body.
    pub fn from_json(status_code: u16, body: &str) -> std::result::Result<Self, serde_json::Error> {
        let parsed: GatewayErrorBody = serde_json::from_str(body)?;
        Ok(Self {
            status_code,
            message: parsed.error.message,
            field_errors: parsed.field_errors,
            original_response: body.to_string(),
        })
    }

    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.field_errors.iter().find_map(|e| e.error_for(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALIDATION_BODY: &str = r#"{
        "error": {"message": "Credit card is invalid"},
        "fieldErrors": [{
            "field": "creditCard",
            "fieldErrors": [
                {"field": "number", "message": "Credit card number is invalid"},
                {"field": "expirationMonth", "message": "Expiration month is invalid"}
            ]
        }]
    }"#;

    #[test]
    fn test_error_with_response_parsing() {
        let error = ErrorWithResponse::from_json(422, VALIDATION_BODY).unwrap();
        assert_eq!(error.status_code, 422);
        assert_eq!(error.message, "Credit card is invalid");
        assert_eq!(error.field_errors.len(), 1);

        let number = error.error_for("number").unwrap();
        assert_eq!(
            number.message.as_deref(),
            Some("Credit card number is invalid")
        );
        assert!(error.error_for("cvv").is_none());
        assert_eq!(error.original_response, VALIDATION_BODY);
    }

    #[test]
    fn test_error_with_response_rejects_unstructured_body() {
        assert!(ErrorWithResponse::from_json(422, "<html>oops</html>").is_err());
    }

    #[test]
    fn test_validation_error_display_and_accessor() {
        let error: TokenizeError = ErrorWithResponse::new("Credit card is invalid", vec![]).into();
        assert_eq!(error.to_string(), "Validation error: Credit card is invalid");
        assert!(error.as_validation().is_some());
        assert!(TokenizeError::TransportError("down".into()).as_validation().is_none());
    }
}
