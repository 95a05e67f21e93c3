//! Configuration types for the Paysheet back office.
//!
//! These types represent the validated runtime configuration used by the server.
//! The actual config loading/parsing is handled by the server crate.

mod gateway;
mod refund;
mod server;
mod sheets;

pub use gateway::GatewayConfig;
pub use refund::RefundPolicy;
pub use server::ServerConfig;
pub use sheets::SheetsConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// Only the sections that can change on reload live here; the spreadsheet
/// connection is fixed for the lifetime of the process.
#[derive(Clone)]
pub struct SharedConfig {
    /// Server configuration (listen address, etc.).
    pub server: Arc<RwLock<ServerConfig>>,
    /// Payment gateway endpoint and merchant credentials.
    pub gateway: Arc<RwLock<GatewayConfig>>,
    /// Refund eligibility policy.
    pub refund: Arc<RwLock<RefundPolicy>>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, gateway: GatewayConfig, refund: RefundPolicy) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            gateway: Arc::new(RwLock::new(gateway)),
            refund: Arc::new(RwLock::new(refund)),
        }
    }
}
