//! Byte layout of the data hashed when searching for and checking a proof.
use crate::error::Error;
use crate::BlockHash;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How the variable-length block fields are laid out ahead of the nonce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// `prev_hash || data || nonce || difficulty` with no field boundaries.
    ///
    /// Distinct `(prev_hash, data)` splits of the same bytes collide under this layout.
    Concatenated,
    /// Each variable-length field is preceded by its big-endian `u64` length.
    #[default]
    LengthPrefixed,
}

impl Framing {
    /// Write the nonce-independent head of the commitment.
    pub fn write_prefix(&self, out: &mut Vec<u8>, prev_hash: &[u8], data: &[u8]) {
        match self {
            Framing::Concatenated => {
                out.extend_from_slice(prev_hash);
                out.extend_from_slice(data);
            }
            Framing::LengthPrefixed => {
                out.extend_from_slice(&(prev_hash.len() as u64).to_be_bytes());
                out.extend_from_slice(prev_hash);
                out.extend_from_slice(&(data.len() as u64).to_be_bytes());
                out.extend_from_slice(data);
            }
        }
    }
}

/// Encode a nonce as the 8-byte big-endian form of a signed 64-bit integer.
pub fn encode_nonce(nonce: u64) -> Result<[u8; 8], Error> {
    let signed = i64::try_from(nonce).map_err(|_| Error::Encoding { nonce })?;
    Ok(signed.to_be_bytes())
}

/// Encode the difficulty the same way as the nonce.
pub fn encode_difficulty(difficulty: u32) -> [u8; 8] {
    i64::from(difficulty).to_be_bytes()
}

/// Build the full commitment for one nonce.
pub fn build_commitment(
    framing: Framing,
    prev_hash: &[u8],
    data: &[u8],
    nonce: u64,
    difficulty: u32,
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(prev_hash.len() + data.len() + 32);
    framing.write_prefix(&mut out, prev_hash, data);
    out.extend_from_slice(&encode_nonce(nonce)?);
    out.extend_from_slice(&encode_difficulty(difficulty));
    Ok(out)
}

/// SHA-256 state primed with the commitment prefix, reused across nonces.
#[derive(Clone)]
pub struct CommitmentHasher {
    primed: Sha256,
    difficulty: [u8; 8],
}

impl CommitmentHasher {
    pub fn new(framing: Framing, prev_hash: &[u8], data: &[u8], difficulty: u32) -> Self {
        let mut prefix = Vec::with_capacity(prev_hash.len() + data.len() + 16);
        framing.write_prefix(&mut prefix, prev_hash, data);
        let mut primed = Sha256::new();
        primed.update(&prefix);
        Self {
            primed,
            difficulty: encode_difficulty(difficulty),
        }
    }

    /// Hash the commitment for `nonce`.
    #[inline]
    pub fn hash(&self, nonce: u64) -> Result<BlockHash, Error> {
        let mut hasher = self.primed.clone();
        hasher.update(encode_nonce(nonce)?);
        hasher.update(self.difficulty);
        Ok(hasher.finalize().into())
    }
}
