//! Solana address parsing and validation.
//!
//! An address is the base58 encoding of a 32-byte Ed25519 public key (or of a
//! program-derived address, which is 32 bytes off the curve).

use std::fmt;
use std::str::FromStr;

use crate::blockchain::models::AddressError;

/// A 32-byte Solana account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl FromStr for Pubkey {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::Encoding(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| AddressError::Length(v.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

/// Returns true if `address` is a well-formed Solana address.
///
/// Never panics; malformed input (including the empty string) is simply `false`.
pub fn is_valid_address(address: &str) -> bool {
    address.parse::<Pubkey>().is_ok()
}
