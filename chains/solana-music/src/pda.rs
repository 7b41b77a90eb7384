//! Program-derived addresses used by the music program.
//!
//! Seeds must match the program's own layout byte for byte: a mismatch does
//! not fail, it silently yields a different address the program will reject.

use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};
use thiserror::Error;

pub const MUSIC_SEED: &[u8] = b"music";
pub const BUYER_SEED: &[u8] = b"buyer";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Seed {index} is {len} bytes (max {max})", max = MAX_SEED_LEN)]
    SeedTooLong { index: usize, len: usize },

    #[error("{count} seeds plus bump exceed the limit of {max}", max = MAX_SEEDS)]
    TooManySeeds { count: usize },

    #[error("No off-curve bump found for program {program_id}")]
    Exhausted { program_id: Pubkey },
}

/// An address owned by a program, plus the bump that pushed it off the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Fixed-width big-endian encoding, identical to the program's `to_be_bytes()`.
pub fn encode_resource_id(resource_id: u64) -> [u8; 8] {
    resource_id.to_be_bytes()
}

pub fn decode_resource_id(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}

/// Derives `(address, bump)` from `namespace || seeds` under `program_id`.
pub fn derive_address(
    namespace: &[u8],
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<DerivedAddress, DerivationError> {
    let mut all_seeds: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
    all_seeds.push(namespace);
    all_seeds.extend_from_slice(seeds);

    // The bump occupies one seed slot during the search.
    if all_seeds.len() + 1 > MAX_SEEDS {
        return Err(DerivationError::TooManySeeds {
            count: all_seeds.len(),
        });
    }
    if let Some((index, seed)) = all_seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(DerivationError::SeedTooLong {
            index,
            len: seed.len(),
        });
    }

    Pubkey::try_find_program_address(&all_seeds, program_id)
        .map(|(address, bump)| DerivedAddress { address, bump })
        .ok_or(DerivationError::Exhausted {
            program_id: *program_id,
        })
}

/// `["music", resource_id.to_be_bytes()]`
pub fn derive_music_address(
    program_id: &Pubkey,
    resource_id: u64,
) -> Result<DerivedAddress, DerivationError> {
    let id_bytes = encode_resource_id(resource_id);
    derive_address(MUSIC_SEED, &[&id_bytes[..]], program_id)
}

/// `["buyer", buyer_pubkey]`
pub fn derive_buyer_address(
    program_id: &Pubkey,
    buyer: &Pubkey,
) -> Result<DerivedAddress, DerivationError> {
    derive_address(BUYER_SEED, &[buyer.as_ref()], program_id)
}
