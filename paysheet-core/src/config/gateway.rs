//! Payment gateway configuration.

use url::Url;

use crate::gateway::GatewayCredentials;

/// Where the gateway lives and how the merchant logs in.
#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub email: String,
    pub password: String,
    /// Query live transactions instead of test ones.
    pub livemode: bool,
}

impl GatewayConfig {
    pub fn credentials(&self) -> GatewayCredentials {
        GatewayCredentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url.as_str())
            .field("email", &self.email)
            .field("livemode", &self.livemode)
            .finish_non_exhaustive()
    }
}
