//! # Core Logic - Shared Utilities for Solana Clients
//!
//! This crate provides the ambient pieces shared by the chain clients:
//! configuration primitives, the typed error taxonomy, the task trait the
//! clients schedule their remote calls through, logging setup and keypair
//! loading.
//!
//! ## Modules
//!
//! - [`config`] - RPC and wallet configuration structures
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions
//! - [`utils`] - Utility modules (logger, wallet loading)

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{parse_commitment, RpcConfig, WalletSource};
pub use error::{ConfigError, WalletError};
pub use traits::{Task, TaskResult};

pub use utils::{setup_logger, WalletManager};
