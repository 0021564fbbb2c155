//! Legacy Solana transaction assembly.
//!
//! ```text
//! transaction = compact-u16(n) | n * 64-byte signature | message
//! message     = header(3 bytes) | compact-u16(k) | k * 32-byte key
//!             | 32-byte recent blockhash | compact-u16(m) | m * instruction
//! instruction = u8 program index | compact-u16(a) | a * u8 account index
//!             | compact-u16(d) | d bytes of data
//! ```

use crate::blockchain::{address::Pubkey, models::ChainError, wallet::Wallet};

/// System program id (all zero bytes).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

const SYSTEM_TRANSFER_INDEX: u32 = 2;

/// Solana's variable-length u16 ("shortvec") encoding.
pub fn encode_compact_u16(value: u16, out: &mut Vec<u8>) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if rem == 0 {
            break;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// System program `Transfer` of `lamports` from `from` to `to`.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*from, true),
            AccountMeta::writable(*to, false),
        ],
        data,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledInstruction {
    program_index: u8,
    accounts: Vec<u8>,
    data: Vec<u8>,
}

/// A compiled, unsigned message with a single fee payer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    num_required_signatures: u8,
    num_readonly_signed: u8,
    num_readonly_unsigned: u8,
    account_keys: Vec<Pubkey>,
    recent_blockhash: [u8; 32],
    instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Collect and order the account keys, then replace keys with indices.
    ///
    /// Keys are ordered writable signers, readonly signers, writable
    /// non-signers, readonly non-signers; the fee payer is always index 0.
    pub fn compile(
        instructions: &[Instruction],
        fee_payer: &Pubkey,
        recent_blockhash: [u8; 32],
    ) -> Result<Self, ChainError> {
        let mut metas: Vec<AccountMeta> = vec![AccountMeta::writable(*fee_payer, true)];
        let mut upsert = |meta: &AccountMeta| {
            match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                Some(existing) => {
                    existing.is_signer |= meta.is_signer;
                    existing.is_writable |= meta.is_writable;
                }
                None => metas.push(meta.clone()),
            }
        };
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta);
            }
            upsert(&AccountMeta::readonly(ix.program_id, false));
        }

        // sort_by_key is stable, so the fee payer stays first among writable signers
        metas.sort_by_key(|m| match (m.is_signer, m.is_writable) {
            (true, true) => 0u8,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        if metas.len() > u8::MAX as usize {
            return Err(ChainError::TransactionBuild(
                "too many accounts in one transaction".into(),
            ));
        }

        let count = |signer: bool, writable: bool| {
            metas
                .iter()
                .filter(|m| m.is_signer == signer && m.is_writable == writable)
                .count() as u8
        };
        let num_readonly_signed = count(true, false);
        let num_required_signatures = count(true, true) + num_readonly_signed;
        let num_readonly_unsigned = count(false, false);

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, ChainError> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| ChainError::TransactionBuild(format!("account {} not compiled", key)))
        };

        let compiled = instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_index: index_of(&ix.program_id)?,
                    accounts: ix
                        .accounts
                        .iter()
                        .map(|m| index_of(&m.pubkey))
                        .collect::<Result<_, _>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>, ChainError>>()?;

        Ok(Self {
            num_required_signatures,
            num_readonly_signed,
            num_readonly_unsigned,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    pub fn account_keys(&self) -> &[Pubkey] {
        &self.account_keys
    }

    pub fn num_required_signatures(&self) -> u8 {
        self.num_required_signatures
    }

    /// The bytes that get signed.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        encode_compact_u16(self.account_keys.len() as u16, &mut buf);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }
        buf.extend_from_slice(&self.recent_blockhash);

        encode_compact_u16(self.instructions.len() as u16, &mut buf);
        for ix in &self.instructions {
            buf.push(ix.program_index);
            encode_compact_u16(ix.accounts.len() as u16, &mut buf);
            buf.extend_from_slice(&ix.accounts);
            encode_compact_u16(ix.data.len() as u16, &mut buf);
            buf.extend_from_slice(&ix.data);
        }
        buf
    }
}

/// A fully signed transaction ready for `sendTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub signature: [u8; 64],
    pub wire: Vec<u8>,
}

impl SignedTransaction {
    /// base58 of the first signature, which is how the network names the transaction.
    pub fn id(&self) -> String {
        bs58::encode(self.signature).into_string()
    }
}

/// Sign `message` with the wallet, which must be its only signer.
pub fn sign(message: &Message, wallet: &Wallet) -> Result<SignedTransaction, ChainError> {
    if message.num_required_signatures != 1 || message.account_keys[0] != wallet.address() {
        return Err(ChainError::TransactionBuild(
            "message must have the wallet as its single signer".into(),
        ));
    }
    let message_bytes = message.serialize();
    let signature = wallet.sign(&message_bytes);

    let mut wire = Vec::with_capacity(1 + 64 + message_bytes.len());
    encode_compact_u16(1, &mut wire);
    wire.extend_from_slice(&signature);
    wire.extend_from_slice(&message_bytes);

    Ok(SignedTransaction { signature, wire })
}
