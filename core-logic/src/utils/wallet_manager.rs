use crate::config::WalletSource;
use crate::error::WalletError;
use solana_sdk::signature::Keypair;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Resolves a [`WalletSource`] into a signing keypair.
///
/// Only reads key material; never writes or generates it.
pub struct WalletManager;

impl WalletManager {
    const KEYPAIR_LEN: usize = 64;

    pub fn load_keypair(source: &WalletSource) -> Result<Keypair, WalletError> {
        match source {
            WalletSource::File { path } => {
                let resolved = Self::expand_home(path);
                debug!("Reading keypair file {}", resolved.display());
                if !resolved.exists() {
                    return Err(WalletError::FileNotFound {
                        path: resolved.display().to_string(),
                    });
                }
                let raw = fs::read_to_string(&resolved).map_err(|e| WalletError::IoError {
                    path: resolved.display().to_string(),
                    msg: e.to_string(),
                })?;
                Self::parse_keypair_json(&raw)
            }
            WalletSource::Env { key } => {
                let raw = std::env::var(key)
                    .map_err(|_| WalletError::EnvNotSet { key: key.clone() })?;
                Self::parse_keypair_json(&raw)
            }
        }
    }

    /// Parses the Solana CLI keypair format: a JSON array of 64 bytes.
    pub fn parse_keypair_json(raw: &str) -> Result<Keypair, WalletError> {
        let bytes: Vec<u8> = serde_json::from_str(raw.trim()).map_err(|e| {
            WalletError::InvalidKeyFormat {
                reason: e.to_string(),
            }
        })?;
        if bytes.len() != Self::KEYPAIR_LEN {
            return Err(WalletError::InvalidKeyLength {
                length: bytes.len(),
            });
        }
        Keypair::from_bytes(&bytes).map_err(|e| WalletError::InvalidKeyFormat {
            reason: e.to_string(),
        })
    }

    fn expand_home(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(path)
    }
}
