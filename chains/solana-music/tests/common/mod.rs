#![allow(dead_code)]

use async_trait::async_trait;
use solana_music::instruction::MusicInstruction;
use solana_music::ledger::{Ledger, RemoteError};
use solana_music::pda::derive_music_address;
use solana_music::SequencerState;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Ledger double that plays the music program: it keeps uploaded records
/// and rejects purchases whose beneficiary is not the record owner.
pub struct InMemoryLedger {
    payer: Pubkey,
    program_id: Pubkey,
    upload_failure: Option<String>,
    purchase_failure: Option<String>,
    owners: Mutex<HashMap<Pubkey, Pubkey>>,
    calls: Mutex<Vec<MusicInstruction>>,
    state_reader: Mutex<Option<StateReader>>,
    observed: Mutex<Vec<SequencerState>>,
}

type StateReader = Box<dyn Fn() -> Option<SequencerState> + Send + Sync>;

impl InMemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            payer: Keypair::new().pubkey(),
            program_id,
            upload_failure: None,
            purchase_failure: None,
            owners: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            state_reader: Mutex::new(None),
            observed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_uploads(mut self, reason: &str) -> Self {
        self.upload_failure = Some(reason.to_string());
        self
    }

    pub fn failing_purchases(mut self, reason: &str) -> Self {
        self.purchase_failure = Some(reason.to_string());
        self
    }

    /// Samples the sequencer state at every submission.
    pub fn observe_state<F>(&self, reader: F)
    where
        F: Fn() -> Option<SequencerState> + Send + Sync + 'static,
    {
        *self.state_reader.lock().unwrap() = Some(Box::new(reader));
    }

    /// States seen while a transaction was in flight, in submission order.
    pub fn observed_states(&self) -> Vec<SequencerState> {
        self.observed.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<MusicInstruction> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MusicInstruction::UploadMusic(_)))
            .count()
    }

    pub fn purchase_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MusicInstruction::BuyMusic(_)))
            .count()
    }

    pub fn owner_of(&self, music: &Pubkey) -> Option<Pubkey> {
        self.owners.lock().unwrap().get(music).copied()
    }

    fn apply(&self, ix: &Instruction) -> Result<(), RemoteError> {
        if ix.program_id != self.program_id {
            return Err(RemoteError::Rpc("IncorrectProgramId".to_string()));
        }
        let decoded = MusicInstruction::unpack(&ix.data)
            .map_err(|e| RemoteError::Rpc(format!("InstructionDidNotDeserialize: {}", e)))?;
        self.calls.lock().unwrap().push(decoded.clone());

        match decoded {
            MusicInstruction::UploadMusic(args) => {
                if let Some(reason) = &self.upload_failure {
                    return Err(RemoteError::Rpc(reason.clone()));
                }
                let expected = derive_music_address(&self.program_id, args.id)
                    .map_err(|e| RemoteError::Rpc(e.to_string()))?;
                let music = ix.accounts[1].pubkey;
                if music != expected.address || args.bump != expected.bump {
                    return Err(RemoteError::Rpc("ConstraintSeeds".to_string()));
                }
                let mut owners = self.owners.lock().unwrap();
                if owners.contains_key(&music) {
                    return Err(RemoteError::Rpc("account already in use".to_string()));
                }
                owners.insert(music, Pubkey::new_from_array(args.owner));
                Ok(())
            }
            MusicInstruction::BuyMusic(_) => {
                if let Some(reason) = &self.purchase_failure {
                    return Err(RemoteError::Rpc(reason.clone()));
                }
                let music = ix.accounts[0].pubkey;
                let beneficiary = ix.accounts[3].pubkey;
                match self.owner_of(&music) {
                    None => Err(RemoteError::Rpc("AccountNotInitialized".to_string())),
                    Some(owner) if owner != beneficiary => {
                        Err(RemoteError::Rpc("ConstraintRaw: beneficiary".to_string()))
                    }
                    Some(_) => Ok(()),
                }
            }
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    fn payer(&self) -> Pubkey {
        self.payer
    }

    async fn send_and_confirm(&self, instructions: &[Instruction]) -> Result<Signature, RemoteError> {
        let sampled = self.state_reader.lock().unwrap().as_ref().and_then(|read| read());
        if let Some(state) = sampled {
            self.observed.lock().unwrap().push(state);
        }
        for ix in instructions {
            self.apply(ix)?;
        }
        Ok(Signature::new_unique())
    }
}
