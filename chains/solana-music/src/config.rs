use anyhow::Result;
use config::{Config, Environment, File, Map};
use core_logic::config::{RpcConfig, WalletSource};
use core_logic::ConfigError;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// The record to upload and then buy. Missing keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MusicParams {
    pub resource_id: u64,
    pub name: String,
    pub price: u64,
}

impl Default for MusicParams {
    fn default() -> Self {
        Self {
            resource_id: 10,
            name: "Sample Song".to_string(),
            price: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MusicConfig {
    pub rpc_url: String,
    pub program_id: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub keypair_file: Option<String>,
    #[serde(default)]
    pub beneficiary: Option<String>,
    #[serde(default)]
    pub music: MusicParams,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl MusicConfig {
    /// Reads `path` (any format the `config` crate knows) and applies
    /// `MUSIC_*` environment overrides on top, e.g. `MUSIC_RPC_URL` or
    /// `MUSIC_MUSIC__PRICE` for nested keys.
    ///
    /// Not validated here; call [`MusicConfig::validate`] once command-line
    /// overrides are merged.
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`MusicConfig::load`] with an explicit variable map in place
    /// of the process environment. Values stay strings until deserialized so
    /// ids above `i64::MAX` parse exactly.
    pub fn load_with_env(path: &str, env: Option<Map<String, String>>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("MUSIC")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    /// Replaces the configured record fields with the given ones.
    pub fn apply_overrides(
        &mut self,
        resource_id: Option<u64>,
        name: Option<String>,
        price: Option<u64>,
    ) {
        if let Some(id) = resource_id {
            self.music.resource_id = id;
        }
        if let Some(name) = name {
            self.music.name = name;
        }
        if let Some(price) = price {
            self.music.price = price;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rpc_config().validate()?;
        self.program_id()?;
        self.beneficiary()?;
        if self.music.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "music.name".to_string(),
            });
        }
        Ok(())
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            rpc_url: self.rpc_url.clone(),
            commitment: self.commitment.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn wallet_source(&self) -> WalletSource {
        WalletSource::from_optional_file(self.keypair_file.as_deref())
    }

    pub fn program_id(&self) -> Result<Pubkey, ConfigError> {
        parse_pubkey("program_id", &self.program_id)
    }

    pub fn beneficiary(&self) -> Result<Option<Pubkey>, ConfigError> {
        match self.beneficiary.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_pubkey("beneficiary", value).map(Some),
        }
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidPubkey {
        field: field.to_string(),
        value: value.to_string(),
    })
}
