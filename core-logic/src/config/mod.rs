use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

/// Connection settings for a Solana JSON-RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub rpc_url: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl RpcConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            commitment: default_commitment(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ConfigError::InvalidRpcUrl {
                url: self.rpc_url.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        parse_commitment(&self.commitment)?;
        Ok(())
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig, ConfigError> {
        parse_commitment(&self.commitment)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Maps a commitment name onto the SDK's commitment config.
pub fn parse_commitment(level: &str) -> Result<CommitmentConfig, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(ConfigError::InvalidValue {
            field: "commitment".to_string(),
            reason: format!("unknown level '{}'", other),
        }),
    }
}

/// Where the signing keypair comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletSource {
    /// Solana CLI keypair file (JSON array of 64 bytes).
    File { path: String },
    /// Environment variable holding the same JSON array.
    Env { key: String },
}

impl WalletSource {
    pub const DEFAULT_ENV_KEY: &'static str = "SOLANA_KEYPAIR";

    /// Prefers an explicit file, falls back to the default env var.
    pub fn from_optional_file(path: Option<&str>) -> Self {
        match path {
            Some(p) if !p.trim().is_empty() => WalletSource::File {
                path: p.to_string(),
            },
            _ => WalletSource::Env {
                key: Self::DEFAULT_ENV_KEY.to_string(),
            },
        }
    }
}
