use crate::instruction::InstructionError;
use crate::pda::DerivationError;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A remote write that did not land.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Failed to fetch recent blockhash: {0}")]
    Blockhash(String),

    #[error("Transaction rejected: {0}")]
    Rpc(String),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Encoding(#[from] InstructionError),
}

/// Signed submission to the ledger.
///
/// `send_and_confirm` resolves only once the transaction reached the
/// configured commitment, or failed.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Identity that pays for and signs every transaction.
    fn payer(&self) -> Pubkey;

    async fn send_and_confirm(&self, instructions: &[Instruction]) -> Result<Signature, RemoteError>;
}

pub struct RpcLedger {
    client: RpcClient,
    keypair: Arc<Keypair>,
}

impl RpcLedger {
    pub fn new(
        rpc_url: String,
        timeout: Duration,
        commitment: CommitmentConfig,
        keypair: Keypair,
    ) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(rpc_url, timeout, commitment),
            keypair: Arc::new(keypair),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn payer(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn send_and_confirm(&self, instructions: &[Instruction]) -> Result<Signature, RemoteError> {
        let payer = self.keypair.pubkey();
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| RemoteError::Blockhash(e.to_string()))?;

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer),
            &[&*self.keypair],
            blockhash,
        );
        debug!("Submitting tx {} with {} instruction(s)", tx.signatures[0], instructions.len());

        self.client
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(|e| RemoteError::Rpc(e.to_string()))
    }
}
