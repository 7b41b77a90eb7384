//! # Solana Music - marketplace client
//!
//! Uploads a music record to the on-chain music program and then buys it,
//! deriving the program addresses both calls need.
//!
//! - [`pda`] - address derivation
//! - [`instruction`] - Anchor encoding of `upload_music` / `buy_music`
//! - [`ledger`] - signed submission over JSON-RPC
//! - [`task`] - the two remote calls as tasks
//! - [`sequencer`] - the upload-gated purchase flow

pub mod config;
pub mod instruction;
pub mod ledger;
pub mod pda;
pub mod sequencer;
pub mod task;

pub use self::config::{MusicConfig, MusicParams};
pub use ledger::{Ledger, RemoteError, RpcLedger};
pub use pda::{DerivationError, DerivedAddress};
pub use sequencer::{SequenceOutcome, SequencerError, SequencerState, TransactionSequencer};
