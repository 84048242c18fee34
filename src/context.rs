use crate::config::{Authorization, ClientConfig};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    #[default]
    Custom,
    DropIn,
}

impl IntegrationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationType::Custom => "custom",
            IntegrationType::DropIn => "dropin",
        }
    }
}

/// Everything a payment-method client needs to talk to the gateway.
///
/// Cloning is cheap; the configuration is shared behind an `Arc` and the
/// session id stays the same across clones.
#[derive(Debug, Clone)]
pub struct ClientContext {
    config: Arc<ClientConfig>,
    authorization: Authorization,
    session_id: Uuid,
    integration: IntegrationType,
}

impl ClientContext {
    pub fn new(config: ClientConfig, authorization: Authorization) -> Self {
        Self {
            config: Arc::new(config),
            authorization,
            session_id: Uuid::new_v4(),
            integration: IntegrationType::default(),
        }
    }

    pub fn with_integration(mut self, integration: IntegrationType) -> Self {
        self.integration = integration;
        self
    }

    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn integration(&self) -> IntegrationType {
        self.integration
    }
}
