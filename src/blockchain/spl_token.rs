//! SPL token program helpers: associated token accounts and transfers.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use crate::blockchain::{
    address::Pubkey,
    models::ChainError,
    transaction::{AccountMeta, Instruction, SYSTEM_PROGRAM_ID},
};

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
]);

/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
]);

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

const TRANSFER_CHECKED_INDEX: u8 = 12;
const CREATE_IDEMPOTENT_INDEX: u8 = 1;

/// Find the program-derived address for `seeds` under `program_id`.
///
/// Bumps are tried from 255 downwards; the first hash that is not a valid
/// Ed25519 point wins.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), ChainError> {
    for bump in (0..=u8::MAX).rev() {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update([bump]);
        hasher.update(program_id.as_bytes());
        hasher.update(PDA_MARKER);
        let hash: [u8; 32] = hasher.finalize().into();

        if CompressedEdwardsY(hash).decompress().is_none() {
            return Ok((Pubkey::new(hash), bump));
        }
    }
    Err(ChainError::TransactionBuild(
        "no viable bump seed for program address".into(),
    ))
}

/// The associated token account holding `mint` for `owner`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, ChainError> {
    find_program_address(
        &[
            owner.as_bytes(),
            TOKEN_PROGRAM_ID.as_bytes(),
            mint.as_bytes(),
        ],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}

/// Create `owner`'s associated token account for `mint` unless it already exists.
pub fn create_associated_token_account_idempotent(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Instruction, ChainError> {
    let ata = associated_token_address(owner, mint)?;
    Ok(Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(ata, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: vec![CREATE_IDEMPOTENT_INDEX],
    })
}

/// `TransferChecked` of `amount` base units between two token accounts.
pub fn transfer_checked(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let mut data = Vec::with_capacity(10);
    data.push(TRANSFER_CHECKED_INDEX);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);
    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*source, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::writable(*destination, false),
            AccountMeta::readonly(*owner, true),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_ids_match_their_base58_names() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
    }

    #[test]
    fn derived_addresses_are_off_curve_and_deterministic() {
        let owner = Pubkey::new([11u8; 32]);
        let mint: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();
        let a = associated_token_address(&owner, &mint).unwrap();
        let b = associated_token_address(&owner, &mint).unwrap();
        assert_eq!(a, b);
        assert!(CompressedEdwardsY(a.to_bytes()).decompress().is_none());
        assert_ne!(a, associated_token_address(&mint, &owner).unwrap());
    }

    #[test]
    fn associated_token_address_known_vector() {
        // owner is the ed25519 public key of the all-7 seed
        let owner: Pubkey = "GmaDrppBC7P5ARKV8g3djiwP89vz1jLK23V2GBjuAEGB".parse().unwrap();
        let mint: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();
        let (ata, bump) = find_program_address(
            &[owner.as_bytes(), TOKEN_PROGRAM_ID.as_bytes(), mint.as_bytes()],
            &ASSOCIATED_TOKEN_PROGRAM_ID,
        )
        .unwrap();
        assert_eq!(ata.to_string(), "7woc3ajaGMMXczFYjxon4aQoHH3j126fMUR9c58eHRsK");
        assert_eq!(bump, 251);
        assert_eq!(associated_token_address(&owner, &mint).unwrap(), ata);
    }

    #[test]
    fn transfer_checked_data_layout() {
        let k = |b: u8| Pubkey::new([b; 32]);
        let ix = transfer_checked(&k(1), &k(2), &k(3), &k(4), 5_000_000, 6);
        assert_eq!(ix.program_id, TOKEN_PROGRAM_ID);
        assert_eq!(ix.data[0], 12);
        assert_eq!(&ix.data[1..9], &5_000_000u64.to_le_bytes());
        assert_eq!(ix.data[9], 6);
        assert!(ix.accounts[3].is_signer);
        assert!(!ix.accounts[3].is_writable);
    }
}
