//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod logger;
pub(crate) mod wallet_manager;

pub use logger::setup_logger;
pub use wallet_manager::WalletManager;
