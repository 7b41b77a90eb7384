use crate::instruction::PurchaseRequest;
use crate::ledger::{Ledger, RemoteError};
use crate::pda::{derive_buyer_address, derive_music_address};
use crate::task::{Task, TaskContext, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tracing::{debug, error};

/// Buys `resource_id` with the payer as buyer.
///
/// The beneficiary must be the record's owner or the program rejects the
/// purchase; that rule lives on-chain and is not checked here. Not retried,
/// and a rejection leaves the earlier upload in place.
pub async fn buy_music(
    ledger: &dyn Ledger,
    program_id: &Pubkey,
    resource_id: u64,
    beneficiary: Option<Pubkey>,
) -> Result<Signature, RemoteError> {
    let payer = ledger.payer();
    let music = derive_music_address(program_id, resource_id)?;
    let buyer = derive_buyer_address(program_id, &payer)?;
    debug!(
        "Buyer PDA for {}: {} (bump {})",
        payer, buyer.address, buyer.bump
    );

    let request = PurchaseRequest {
        resource_id,
        music: music.address,
        buyer,
        payer,
        beneficiary: beneficiary.unwrap_or(payer),
    };
    let ix = request.to_instruction(program_id)?;

    ledger.send_and_confirm(&[ix]).await
}

pub struct BuyMusicTask;

#[async_trait]
impl Task<TaskContext> for BuyMusicTask {
    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        let resource_id = ctx.params.resource_id;
        match buy_music(ctx.ledger.as_ref(), &ctx.program_id, resource_id, ctx.beneficiary).await {
            Ok(sig) => Ok(TaskResult::succeeded(
                format!("Purchased id {}", resource_id),
                sig.to_string(),
            )),
            Err(e) => {
                error!("Error purchasing music: {}", e);
                Ok(TaskResult::failed(format!("Purchase rejected: {}", e)))
            }
        }
    }

    fn name(&self) -> &str {
        "02_buyMusic"
    }
}
