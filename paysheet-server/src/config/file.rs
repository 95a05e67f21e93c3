//! TOML file configuration structures.
//!
//! These structs directly map to the `paysheet.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub refund: RefundConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Payment gateway section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: Url,
    pub email: String,
    /// Merchant password. Falls back to `PAYMONGO_PASS` when omitted.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub livemode: bool,
}

fn default_gateway_url() -> Url {
    Url::parse(paysheet_core::gateway::PaymongoGateway::DEFAULT_BASE_URL)
        .expect("valid default gateway url")
}

/// Spreadsheet section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub service_account_email: String,
    /// PEM private key. Falls back to `GOOGLE_PRIVATE_KEY` when omitted.
    #[serde(default)]
    pub private_key: Option<String>,
}

/// Refund policy section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefundConfig {
    /// Hours after payment during which refunds are accepted.
    #[serde(default)]
    pub policy_hours: Option<u32>,
}
