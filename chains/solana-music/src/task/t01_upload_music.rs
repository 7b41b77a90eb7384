use crate::config::MusicParams;
use crate::instruction::UploadRequest;
use crate::ledger::{Ledger, RemoteError};
use crate::pda::derive_music_address;
use crate::task::{Task, TaskContext, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tracing::{debug, error};

/// Creates the music record owned by the payer. Not retried.
pub async fn upload_music(
    ledger: &dyn Ledger,
    program_id: &Pubkey,
    params: &MusicParams,
) -> Result<Signature, RemoteError> {
    let uploader = ledger.payer();
    let music = derive_music_address(program_id, params.resource_id)?;
    debug!(
        "Music PDA for id {}: {} (bump {})",
        params.resource_id, music.address, music.bump
    );

    let request = UploadRequest {
        resource_id: params.resource_id,
        name: params.name.clone(),
        price: params.price,
        owner: uploader,
        signer: uploader,
        music,
    };
    let ix = request.to_instruction(program_id)?;

    ledger.send_and_confirm(&[ix]).await
}

pub struct UploadMusicTask;

#[async_trait]
impl Task<TaskContext> for UploadMusicTask {
    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        match upload_music(ctx.ledger.as_ref(), &ctx.program_id, &ctx.params).await {
            Ok(sig) => Ok(TaskResult::succeeded(
                format!("Uploaded '{}' (id {})", ctx.params.name, ctx.params.resource_id),
                sig.to_string(),
            )),
            Err(e) => {
                error!("Error uploading music: {}", e);
                Ok(TaskResult::failed(format!("Upload rejected: {}", e)))
            }
        }
    }

    fn name(&self) -> &str {
        "01_uploadMusic"
    }
}
