use crate::config::MusicParams;
use crate::ledger::Ledger;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

pub mod t01_upload_music;
pub mod t02_buy_music;

pub use self::t01_upload_music::{upload_music, UploadMusicTask};
pub use self::t02_buy_music::{buy_music, BuyMusicTask};

pub use core_logic::traits::{Task, TaskResult};

#[derive(Clone)]
pub struct TaskContext {
    pub ledger: Arc<dyn Ledger>,
    pub program_id: Pubkey,
    pub params: MusicParams,
    /// Overrides the purchase beneficiary; the payer is used otherwise.
    pub beneficiary: Option<Pubkey>,
}

impl TaskContext {
    pub fn new(ledger: Arc<dyn Ledger>, program_id: Pubkey, params: MusicParams) -> Self {
        Self {
            ledger,
            program_id,
            params,
            beneficiary: None,
        }
    }

    pub fn with_beneficiary(mut self, beneficiary: Option<Pubkey>) -> Self {
        self.beneficiary = beneficiary;
        self
    }
}

// Trait alias
pub type MusicTask = dyn Task<TaskContext> + Send + Sync;
