//! Application state shared across all request handlers.

use paysheet_core::config::SharedConfig;
use paysheet_core::framework::SheetProcessor;
use paysheet_core::gateway::PaymentGateway;
use paysheet_core::sheets::SheetStore;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Spreadsheet access for entity queries.
    pub sheets: SheetProcessor,
    /// Payment gateway client.
    pub gateway: Arc<dyn PaymentGateway>,
    /// Runtime configuration (reloaded on SIGHUP).
    pub config: SharedConfig,
}

impl AppState {
    pub fn new(
        sheets: Arc<dyn SheetStore>,
        gateway: Arc<dyn PaymentGateway>,
        config: SharedConfig,
    ) -> Self {
        Self {
            sheets: SheetProcessor::new(sheets),
            gateway,
            config,
        }
    }

    /// Get the gateway token for server-side lookups, using the configured
    /// merchant credentials.
    pub async fn gateway_token(&self) -> Result<String, paysheet_core::gateway::GatewayError> {
        let credentials = self.config.gateway.read().await.credentials();
        Ok(self.gateway.authenticate(&credentials).await?.token)
    }

    pub async fn livemode(&self) -> bool {
        self.config.gateway.read().await.livemode
    }
}
