//! The active wallet: its address and signing key.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use secrecy::{ExposeSecret, Secret};
use zeroize::{Zeroize, Zeroizing};

use crate::blockchain::{address::Pubkey, models::WalletError};

/// Wallet identity, created once at startup and never mutated.
pub struct Wallet {
    address: Pubkey,
    seed: Secret<[u8; 32]>,
}

impl Wallet {
    /// Build the wallet from the 32-byte Ed25519 seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address = Pubkey::new(signing_key.verifying_key().to_bytes());
        Self {
            address,
            seed: Secret::new(seed),
        }
    }

    /// Parse the secret the way Solana tooling exports it.
    ///
    /// Accepted forms:
    /// - base58 of the 64-byte keypair (`seed || pubkey`), as exported by wallets
    /// - base58 of the bare 32-byte seed
    /// - a JSON byte array of either length, as written by `solana-keygen`
    pub fn from_secret(secret: &str) -> Result<Self, WalletError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(WalletError::InvalidPrivateKey("secret is empty".into()));
        }

        let bytes: Zeroizing<Vec<u8>> = if secret.starts_with('[') {
            Zeroizing::new(serde_json::from_str::<Vec<u8>>(secret).map_err(|e| {
                WalletError::InvalidPrivateKey(format!("invalid JSON byte array: {}", e))
            })?)
        } else {
            Zeroizing::new(bs58::decode(secret).into_vec().map_err(|e| {
                WalletError::InvalidPrivateKey(format!("base58 decode failed: {}", e))
            })?)
        };

        match bytes.len() {
            32 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes);
                let wallet = Self::from_seed(seed);
                seed.zeroize();
                Ok(wallet)
            }
            64 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes[..32]);
                let wallet = Self::from_seed(seed);
                seed.zeroize();
                if wallet.address.as_bytes()[..] != bytes[32..] {
                    return Err(WalletError::KeypairMismatch);
                }
                Ok(wallet)
            }
            n => Err(WalletError::InvalidPrivateKey(format!(
                "expected 32 or 64 bytes, got {}",
                n
            ))),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    /// Ed25519 signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let signing_key = SigningKey::from_bytes(self.seed.expose_secret());
        signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    const SEED: [u8; 32] = [7u8; 32];

    fn keypair_bytes() -> Vec<u8> {
        let wallet = Wallet::from_seed(SEED);
        let mut bytes = SEED.to_vec();
        bytes.extend_from_slice(wallet.address().as_bytes());
        bytes
    }

    #[test]
    fn base58_keypair_and_seed_give_same_address() {
        let from_seed = Wallet::from_seed(SEED);
        let keypair = bs58::encode(keypair_bytes()).into_string();
        let seed_only = bs58::encode(SEED).into_string();
        assert_eq!(Wallet::from_secret(&keypair).unwrap().address(), from_seed.address());
        assert_eq!(Wallet::from_secret(&seed_only).unwrap().address(), from_seed.address());
    }

    #[test]
    fn json_byte_array_is_accepted() {
        let json = serde_json::to_string(&keypair_bytes()).unwrap();
        let wallet = Wallet::from_secret(&json).unwrap();
        assert_eq!(wallet.address(), Wallet::from_seed(SEED).address());
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let mut bytes = keypair_bytes();
        bytes[63] ^= 0xff;
        let err = Wallet::from_secret(&bs58::encode(bytes).into_string()).unwrap_err();
        assert!(matches!(err, WalletError::KeypairMismatch));
    }

    #[test]
    fn garbage_secrets_are_rejected() {
        assert!(Wallet::from_secret("").is_err());
        assert!(Wallet::from_secret("0OIl").is_err());
        assert!(Wallet::from_secret("[1, 2, 3]").is_err());
        assert!(Wallet::from_secret("[1, 2,").is_err());
    }

    #[test]
    fn signatures_verify_against_the_address() {
        let wallet = Wallet::from_seed(SEED);
        let sig = wallet.sign(b"hello");
        let key = VerifyingKey::from_bytes(wallet.address().as_bytes()).unwrap();
        assert!(key.verify(b"hello", &Signature::from_bytes(&sig)).is_ok());
    }

    #[test]
    fn debug_does_not_leak_the_seed() {
        let debug = format!("{:?}", Wallet::from_seed(SEED));
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("[7, 7"));
    }
}
