//! Configuration module for paysheet-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use paysheet_core::config::{
    GatewayConfig, RefundPolicy, ServerConfig, SharedConfig, SheetsConfig,
};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the gateway password.
pub const GATEWAY_PASSWORD_ENV: &str = "PAYMONGO_PASS";
/// Environment variable holding the service account private key.
pub const PRIVATE_KEY_ENV: &str = "GOOGLE_PRIVATE_KEY";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("{field} is not set in the config file and {env} is not set")]
    MissingSecret {
        field: &'static str,
        env: &'static str,
    },
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub sheets: SheetsConfig,
    pub refund: RefundPolicy,
}

impl LoadedConfig {
    /// Split into the reloadable shared sections and the fixed sheets
    /// connection.
    pub fn into_shared(self) -> (SharedConfig, SheetsConfig) {
        (
            SharedConfig::new(self.server, self.gateway, self.refund),
            self.sheets,
        )
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Fill secrets missing from the file from the environment
    /// 4. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        build_loaded_config(file_config, |name| std::env::var(name).ok())
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn secret(
    value: Option<String>,
    field: &'static str,
    env: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .or_else(|| lookup(env).filter(|v| !v.is_empty()))
        .ok_or(ConfigError::MissingSecret { field, env })
}

fn build_loaded_config(
    file_config: FileConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, ConfigError> {
    let FileConfig {
        server,
        gateway,
        sheets,
        refund,
    } = file_config;

    if gateway.email.is_empty() {
        return Err(ConfigError::ValidationError(
            "gateway.email must not be empty".to_string(),
        ));
    }
    if sheets.spreadsheet_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "sheets.spreadsheet_id must not be empty".to_string(),
        ));
    }

    let password = secret(
        gateway.password,
        "gateway.password",
        GATEWAY_PASSWORD_ENV,
        &lookup,
    )?;
    let private_key = secret(
        sheets.private_key,
        "sheets.private_key",
        PRIVATE_KEY_ENV,
        &lookup,
    )?;

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: server.listen,
        },
        gateway: GatewayConfig {
            base_url: gateway.base_url,
            email: gateway.email,
            password,
            livemode: gateway.livemode,
        },
        sheets: SheetsConfig {
            spreadsheet_id: sheets.spreadsheet_id,
            service_account_email: sheets.service_account_email,
            private_key,
        },
        refund: RefundPolicy {
            window_hours: refund.policy_hours,
        },
    })
}
