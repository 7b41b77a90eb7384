//! Upload-then-purchase flow.
//!
//! ```text
//! Idle -> Uploading -> UploadFailed
//!                   -> UploadSucceeded -> Purchasing -> PurchaseFailed
//!                                                   -> PurchaseSucceeded
//! ```
//!
//! The purchase is issued only after the upload resolved successfully. There
//! is no retry and no compensation when the purchase fails.

use crate::task::{BuyMusicTask, MusicTask, TaskContext, TaskResult, UploadMusicTask};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle = 0,
    Uploading = 1,
    UploadFailed = 2,
    UploadSucceeded = 3,
    Purchasing = 4,
    PurchaseFailed = 5,
    PurchaseSucceeded = 6,
}

impl SequencerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SequencerState::Idle,
            1 => SequencerState::Uploading,
            2 => SequencerState::UploadFailed,
            3 => SequencerState::UploadSucceeded,
            4 => SequencerState::Purchasing,
            5 => SequencerState::PurchaseFailed,
            6 => SequencerState::PurchaseSucceeded,
            _ => SequencerState::Idle,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SequencerState::UploadFailed
                | SequencerState::PurchaseFailed
                | SequencerState::PurchaseSucceeded
        )
    }
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SequencerState::Idle => "IDLE",
            SequencerState::Uploading => "UPLOADING",
            SequencerState::UploadFailed => "UPLOAD_FAILED",
            SequencerState::UploadSucceeded => "UPLOAD_SUCCEEDED",
            SequencerState::Purchasing => "PURCHASING",
            SequencerState::PurchaseFailed => "PURCHASE_FAILED",
            SequencerState::PurchaseSucceeded => "PURCHASE_SUCCEEDED",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    #[error("Sequence already started (state: {state})")]
    AlreadyStarted { state: SequencerState },
}

#[derive(Debug, Clone)]
pub struct SequenceOutcome {
    pub state: SequencerState,
    pub upload: TaskResult,
    /// `None` when the purchase was skipped.
    pub purchase: Option<TaskResult>,
}

impl SequenceOutcome {
    pub fn is_success(&self) -> bool {
        self.state == SequencerState::PurchaseSucceeded
    }
}

pub struct TransactionSequencer {
    ctx: TaskContext,
    state: AtomicU8,
}

impl TransactionSequencer {
    pub fn new(ctx: TaskContext) -> Self {
        Self {
            ctx,
            state: AtomicU8::new(SequencerState::Idle as u8),
        }
    }

    pub fn state(&self) -> SequencerState {
        SequencerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, next: SequencerState) {
        self.state.store(next as u8, Ordering::SeqCst);
        info!("Sequencer -> {}", next);
    }

    /// Runs the upload and, only if it succeeded, the purchase.
    ///
    /// Remote failures never surface as `Err`; they end in a failed terminal
    /// state. A sequencer runs once.
    pub async fn run(&self) -> Result<SequenceOutcome, SequencerError> {
        self.state
            .compare_exchange(
                SequencerState::Idle as u8,
                SequencerState::Uploading as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|current| SequencerError::AlreadyStarted {
                state: SequencerState::from_u8(current),
            })?;
        info!("Sequencer -> {}", SequencerState::Uploading);

        let upload = self.execute(&UploadMusicTask).await;
        if !upload.success {
            self.set_state(SequencerState::UploadFailed);
            info!(target: "task_result", "Purchase SKIPPED because upload failed.");
            return Ok(SequenceOutcome {
                state: SequencerState::UploadFailed,
                upload,
                purchase: None,
            });
        }

        self.set_state(SequencerState::UploadSucceeded);
        info!("Proceeding to purchase music...");
        self.set_state(SequencerState::Purchasing);

        let purchase = self.execute(&BuyMusicTask).await;
        let terminal = if purchase.success {
            SequencerState::PurchaseSucceeded
        } else {
            SequencerState::PurchaseFailed
        };
        self.set_state(terminal);

        Ok(SequenceOutcome {
            state: terminal,
            upload,
            purchase: Some(purchase),
        })
    }

    /// Runs one task and folds any error into a failed completion.
    async fn execute(&self, task: &MusicTask) -> TaskResult {
        let started = Instant::now();
        let result = match task.run(self.ctx.clone()).await {
            Ok(res) => res,
            Err(e) => {
                error!("Task {} aborted: {:#}", task.name(), e);
                TaskResult::failed(e.to_string())
            }
        };
        let elapsed = started.elapsed().as_secs_f64();

        if result.success {
            info!(
                target: "task_result",
                "SUCCESS [{}] {} in {:.1}s (tx: {})",
                task.name(),
                result.message,
                elapsed,
                result.tx_hash.as_deref().unwrap_or("-")
            );
        } else {
            info!(
                target: "task_result",
                "FAILED [{}] {} in {:.1}s",
                task.name(),
                result.message,
                elapsed
            );
        }
        result
    }
}
