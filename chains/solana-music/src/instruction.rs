//! Anchor wire format for the two music program methods.
//!
//! Instruction data is `sha256("global:<method>")[..8]` followed by the Borsh
//! encoding of the method arguments in declaration order.

use crate::pda::DerivedAddress;
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};
use thiserror::Error;

pub const UPLOAD_MUSIC: &str = "upload_music";
pub const BUY_MUSIC: &str = "buy_music";

const DISCRIMINATOR_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    #[error("Failed to encode {method} args: {reason}")]
    Encoding { method: &'static str, reason: String },

    #[error("Instruction data too short: {len} bytes")]
    Truncated { len: usize },

    #[error("Unknown instruction discriminator {0:02x?}")]
    UnknownDiscriminator([u8; DISCRIMINATOR_LEN]),

    #[error("Failed to decode {method} args: {reason}")]
    Decoding { method: &'static str, reason: String },
}

/// Anchor's global namespace sighash.
pub fn discriminator(method: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(format!("global:{}", method).as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct UploadMusicArgs {
    pub id: u64,
    pub name: String,
    pub price: u64,
    pub owner: [u8; 32],
    pub bump: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BuyMusicArgs {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicInstruction {
    UploadMusic(UploadMusicArgs),
    BuyMusic(BuyMusicArgs),
}

impl MusicInstruction {
    pub fn method(&self) -> &'static str {
        match self {
            MusicInstruction::UploadMusic(_) => UPLOAD_MUSIC,
            MusicInstruction::BuyMusic(_) => BUY_MUSIC,
        }
    }

    pub fn pack(&self) -> Result<Vec<u8>, InstructionError> {
        let method = self.method();
        let args = match self {
            MusicInstruction::UploadMusic(args) => borsh::to_vec(args),
            MusicInstruction::BuyMusic(args) => borsh::to_vec(args),
        }
        .map_err(|e| InstructionError::Encoding {
            method,
            reason: e.to_string(),
        })?;

        let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + args.len());
        data.extend_from_slice(&discriminator(method));
        data.extend_from_slice(&args);
        Ok(data)
    }

    pub fn unpack(data: &[u8]) -> Result<Self, InstructionError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(InstructionError::Truncated { len: data.len() });
        }
        let (tag, rest) = data.split_at(DISCRIMINATOR_LEN);
        let mut tag_bytes = [0u8; DISCRIMINATOR_LEN];
        tag_bytes.copy_from_slice(tag);

        if tag_bytes == discriminator(UPLOAD_MUSIC) {
            UploadMusicArgs::try_from_slice(rest)
                .map(MusicInstruction::UploadMusic)
                .map_err(|e| InstructionError::Decoding {
                    method: UPLOAD_MUSIC,
                    reason: e.to_string(),
                })
        } else if tag_bytes == discriminator(BUY_MUSIC) {
            BuyMusicArgs::try_from_slice(rest)
                .map(MusicInstruction::BuyMusic)
                .map_err(|e| InstructionError::Decoding {
                    method: BUY_MUSIC,
                    reason: e.to_string(),
                })
        } else {
            Err(InstructionError::UnknownDiscriminator(tag_bytes))
        }
    }
}

/// Creates the music record at its derived address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub resource_id: u64,
    pub name: String,
    pub price: u64,
    pub owner: Pubkey,
    pub signer: Pubkey,
    pub music: DerivedAddress,
}

impl UploadRequest {
    pub fn to_instruction(&self, program_id: &Pubkey) -> Result<Instruction, InstructionError> {
        let data = MusicInstruction::UploadMusic(UploadMusicArgs {
            id: self.resource_id,
            name: self.name.clone(),
            price: self.price,
            owner: self.owner.to_bytes(),
            bump: self.music.bump,
        })
        .pack()?;

        Ok(Instruction {
            program_id: *program_id,
            accounts: vec![
                AccountMeta::new(self.signer, true),
                AccountMeta::new(self.music.address, false),
                AccountMeta::new_readonly(system_program::id(), false),
            ],
            data,
        })
    }
}

/// Buys an uploaded record. The program only accepts it when `beneficiary`
/// is the record's owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub resource_id: u64,
    pub music: Pubkey,
    pub buyer: DerivedAddress,
    pub payer: Pubkey,
    pub beneficiary: Pubkey,
}

impl PurchaseRequest {
    pub fn to_instruction(&self, program_id: &Pubkey) -> Result<Instruction, InstructionError> {
        let data = MusicInstruction::BuyMusic(BuyMusicArgs {
            id: self.resource_id,
        })
        .pack()?;

        Ok(Instruction {
            program_id: *program_id,
            accounts: vec![
                AccountMeta::new(self.music, false),
                AccountMeta::new(self.buyer.address, false),
                AccountMeta::new(self.payer, true),
                AccountMeta::new(self.beneficiary, false),
                AccountMeta::new_readonly(system_program::id(), false),
            ],
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pda::{derive_buyer_address, derive_music_address};

    fn program_id() -> Pubkey {
        Pubkey::new_from_array([42u8; 32])
    }

    #[test]
    fn test_discriminators_differ_per_method() {
        assert_ne!(discriminator(UPLOAD_MUSIC), discriminator(BUY_MUSIC));
        assert_eq!(discriminator(BUY_MUSIC), discriminator("buy_music"));
    }

    #[test]
    fn test_upload_data_layout() {
        let owner = Pubkey::new_unique();
        let request = UploadRequest {
            resource_id: 10,
            name: "Sample Song".to_string(),
            price: 1_000_000,
            owner,
            signer: owner,
            music: derive_music_address(&program_id(), 10).unwrap(),
        };
        let ix = request.to_instruction(&program_id()).unwrap();

        // discriminator | id u64 LE | name (u32 LE len + utf8) | price u64 LE | owner | bump
        assert_eq!(ix.data.len(), 8 + 8 + 4 + 11 + 8 + 32 + 1);
        assert_eq!(&ix.data[..8], &discriminator(UPLOAD_MUSIC));
        assert_eq!(&ix.data[8..16], &10u64.to_le_bytes());
        assert_eq!(&ix.data[16..20], &11u32.to_le_bytes());
        assert_eq!(&ix.data[20..31], b"Sample Song");
        assert_eq!(&ix.data[31..39], &1_000_000u64.to_le_bytes());
        assert_eq!(&ix.data[39..71], owner.as_ref());
        assert_eq!(ix.data[71], request.music.bump);
    }

    #[test]
    fn test_upload_accounts() {
        let signer = Pubkey::new_unique();
        let music = derive_music_address(&program_id(), 3).unwrap();
        let ix = UploadRequest {
            resource_id: 3,
            name: String::new(),
            price: 0,
            owner: signer,
            signer,
            music,
        }
        .to_instruction(&program_id())
        .unwrap();

        assert_eq!(ix.program_id, program_id());
        assert_eq!(ix.accounts.len(), 3);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, music.address);
        assert!(!ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[2].pubkey, system_program::id());
        assert!(!ix.accounts[2].is_writable);
    }

    #[test]
    fn test_purchase_accounts_and_data() {
        let payer = Pubkey::new_unique();
        let music = derive_music_address(&program_id(), 10).unwrap();
        let buyer = derive_buyer_address(&program_id(), &payer).unwrap();
        let ix = PurchaseRequest {
            resource_id: 10,
            music: music.address,
            buyer,
            payer,
            beneficiary: payer,
        }
        .to_instruction(&program_id())
        .unwrap();

        assert_eq!(ix.data.len(), 16);
        assert_eq!(&ix.data[..8], &discriminator(BUY_MUSIC));
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(
            keys,
            vec![music.address, buyer.address, payer, payer, system_program::id()]
        );
        assert!(ix.accounts[2].is_signer);
        assert_eq!(ix.accounts.iter().filter(|m| m.is_signer).count(), 1);
    }

    #[test]
    fn test_unpack_recovers_instruction() {
        let original = MusicInstruction::UploadMusic(UploadMusicArgs {
            id: u64::MAX,
            name: "Edge".to_string(),
            price: 1,
            owner: [9u8; 32],
            bump: 254,
        });
        let data = original.pack().unwrap();
        assert_eq!(MusicInstruction::unpack(&data).unwrap(), original);
    }

    #[test]
    fn test_unpack_rejects_garbage() {
        assert_eq!(
            MusicInstruction::unpack(&[1, 2, 3]),
            Err(InstructionError::Truncated { len: 3 })
        );
        assert!(matches!(
            MusicInstruction::unpack(&[0u8; 16]),
            Err(InstructionError::UnknownDiscriminator(_))
        ));
    }
}
