//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! Chain crates wrap these into their own errors or bubble them through
//! `anyhow` at the binary boundary.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid public key for '{field}': '{value}'")]
    InvalidPubkey { field: String, value: String },
}

/// Keypair loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Keypair file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("Environment variable '{key}' is not set")]
    EnvNotSet { key: String },

    #[error("Invalid keypair format: expected a JSON array of 64 bytes ({reason})")]
    InvalidKeyFormat { reason: String },

    #[error("Keypair has wrong length: expected 64 bytes, got {length}")]
    InvalidKeyLength { length: usize },
}
