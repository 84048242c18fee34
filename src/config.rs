use crate::error::{Result, TokenizeError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Gateway environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Environment::Development),
            "sandbox" => Some(Environment::Sandbox),
            "production" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn default_client_api_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:3000/merchants/client_api",
            Environment::Sandbox => "https://api.sandbox.braintreegateway.com/client_api",
            Environment::Production => "https://api.braintreegateway.com/client_api",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub currency_iso_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub supported_networks: Vec<String>,
}

/// Merchant configuration as served by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub environment: Environment,
    pub merchant_id: String,
    pub client_api_url: String,
    #[serde(default)]
    pub paypal_enabled: bool,
    #[serde(default)]
    pub paypal: Option<PayPalConfig>,
    #[serde(default)]
    pub google_pay: GooglePayConfig,
    /// Card fields the merchant requires (`cvv`, `postal_code`).
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl ClientConfig {
    /// Sandbox configuration with every payment method enabled.
    pub fn sandbox(merchant_id: impl Into<String>) -> Self {
        Self::for_environment(Environment::Sandbox, merchant_id)
    }

    /// Configuration with every payment method enabled, pointed at the
    /// environment's default client API.
    pub fn for_environment(environment: Environment, merchant_id: impl Into<String>) -> Self {
        Self {
            environment,
            merchant_id: merchant_id.into(),
            client_api_url: environment.default_client_api_url().to_string(),
            paypal_enabled: true,
            paypal: Some(PayPalConfig {
                client_id: Some("sandbox-paypal-client-id".to_string()),
                display_name: Some("Sandbox Merchant".to_string()),
                currency_iso_code: Some("USD".to_string()),
            }),
            google_pay: GooglePayConfig {
                enabled: true,
                supported_networks: vec![
                    "visa".to_string(),
                    "mastercard".to_string(),
                    "amex".to_string(),
                    "discover".to_string(),
                ],
            },
            challenges: Vec::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    /// Default configuration for an authorization when no configuration is
    /// supplied. Tokenization keys carry their environment and merchant;
    /// client tokens fall back to the sandbox.
    pub fn from_authorization(authorization: &Authorization) -> Self {
        match authorization {
            Authorization::TokenizationKey {
                environment,
                merchant_id,
                ..
            } => Self::for_environment(*environment, merchant_id.clone()),
            Authorization::ClientToken { .. } => Self::sandbox("sandbox-merchant"),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn is_cvv_challenge_present(&self) -> bool {
        self.challenges.iter().any(|c| c == "cvv")
    }

    pub fn is_postal_code_challenge_present(&self) -> bool {
        self.challenges.iter().any(|c| c == "postal_code")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Credential used to authorize gateway calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    TokenizationKey {
        key: String,
        environment: Environment,
        merchant_id: String,
    },
    ClientToken {
        authorization_fingerprint: String,
    },
}

impl Authorization {
    /// Parses a tokenization key (`<environment>_<random>_<merchant id>`) or
    /// falls back to treating the value as an authorization fingerprint.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenizeError::ConfigurationError(
                "Authorization must not be empty".to_string(),
            ));
        }

        let mut parts = raw.splitn(3, '_');
        if let Some(environment) = parts.next().and_then(Environment::parse) {
            // An environment prefix commits the value to being a tokenization key
            let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            let (Some(random), Some(merchant)) = (parts.next(), parts.next()) else {
                return Err(TokenizeError::ConfigurationError(format!(
                    "Malformed tokenization key: {raw}"
                )));
            };
            if !valid(random) || !valid(merchant) {
                return Err(TokenizeError::ConfigurationError(format!(
                    "Malformed tokenization key: {raw}"
                )));
            }
            return Ok(Authorization::TokenizationKey {
                key: raw.to_string(),
                environment,
                merchant_id: merchant.to_string(),
            });
        }

        if raw.chars().any(char::is_whitespace) {
            return Err(TokenizeError::ConfigurationError(
                "Authorization fingerprint must not contain whitespace".to_string(),
            ));
        }
        Ok(Authorization::ClientToken {
            authorization_fingerprint: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_JSON: &str = r#"{
        "environment": "sandbox",
        "merchantId": "integration_merchant_id",
        "clientApiUrl": "https://api.sandbox.braintreegateway.com/merchants/integration_merchant_id/client_api",
        "paypalEnabled": true,
        "paypal": {"clientId": "paypal-client-id", "displayName": "Acme", "currencyIsoCode": "USD"},
        "googlePay": {"enabled": false, "supportedNetworks": ["visa"]},
        "challenges": ["cvv", "postal_code"]
    }"#;

    #[test]
    fn test_config_from_json() {
        let config = ClientConfig::from_json(CONFIG_JSON).unwrap();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.merchant_id, "integration_merchant_id");
        assert!(config.paypal_enabled);
        assert!(!config.google_pay.enabled);
        assert!(config.is_cvv_challenge_present());
        assert!(config.is_postal_code_challenge_present());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_rejects_unknown_environment() {
        let json = r#"{"environment": "staging", "merchantId": "m", "clientApiUrl": "u"}"#;
        assert!(matches!(
            ClientConfig::from_json(json),
            Err(TokenizeError::JsonError(_))
        ));
    }

    #[test]
    fn test_parse_tokenization_key() {
        let auth = Authorization::parse("sandbox_tmxhyf7d_dcpspy2brwdjr3qn").unwrap();
        assert_eq!(
            auth,
            Authorization::TokenizationKey {
                key: "sandbox_tmxhyf7d_dcpspy2brwdjr3qn".to_string(),
                environment: Environment::Sandbox,
                merchant_id: "dcpspy2brwdjr3qn".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_client_token_fingerprint() {
        let auth = Authorization::parse("a1b2c3d4e5f6|created_at=2024").unwrap();
        assert_eq!(
            auth,
            Authorization::ClientToken {
                authorization_fingerprint: "a1b2c3d4e5f6|created_at=2024".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_invalid_authorization() {
        assert!(matches!(
            Authorization::parse("   "),
            Err(TokenizeError::ConfigurationError(_))
        ));
        assert!(matches!(
            Authorization::parse("sandbox__merchant"),
            Err(TokenizeError::ConfigurationError(_))
        ));
        assert!(matches!(
            Authorization::parse("not a key"),
            Err(TokenizeError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_environment_prefix_requires_full_key() {
        for raw in ["sandbox_abc", "production_key", "development_"] {
            assert!(
                matches!(
                    Authorization::parse(raw),
                    Err(TokenizeError::ConfigurationError(_))
                ),
                "{raw} should be rejected"
            );
        }
        // Unknown prefixes still read as fingerprints
        assert!(matches!(
            Authorization::parse("staging_abc"),
            Ok(Authorization::ClientToken { .. })
        ));
    }

    #[test]
    fn test_config_follows_tokenization_key_environment() {
        let auth = Authorization::parse("production_tmxhyf7d_livemerchant").unwrap();
        let config = ClientConfig::from_authorization(&auth);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.merchant_id, "livemerchant");
        assert_eq!(
            config.client_api_url,
            Environment::Production.default_client_api_url()
        );

        let auth = Authorization::parse("fingerprint-abc").unwrap();
        assert_eq!(
            ClientConfig::from_authorization(&auth).environment,
            Environment::Sandbox
        );
    }
}
