use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA-256 digest stored in every finalized block.
pub type BlockHash = [u8; 32];

/// A mined unit of the chain.
///
/// Blocks are only produced by the miner or by deserialization; nothing
/// mutates a block once it has been finalized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    #[serde(with = "hex::serde")]
    pub(crate) data: Vec<u8>,
    /// Hash of the preceding block; empty for genesis.
    #[serde(with = "hex::serde")]
    pub(crate) prev_hash: Vec<u8>,
    pub(crate) nonce: u64,
    #[serde(with = "hex::serde")]
    pub(crate) hash: BlockHash,
}

impl Block {
    /// A block awaiting a proof: nonce 0, zeroed hash.
    pub(crate) fn candidate(data: Vec<u8>, prev_hash: Vec<u8>) -> Self {
        Self {
            data,
            prev_hash,
            nonce: 0,
            hash: [0u8; 32],
        }
    }

    /// Reassemble a block received from elsewhere. Nothing is checked here;
    /// run it through [`crate::ProofOfWork::verify`] before trusting it.
    pub fn from_parts(data: Vec<u8>, prev_hash: Vec<u8>, nonce: u64, hash: BlockHash) -> Self {
        Self {
            data,
            prev_hash,
            nonce,
            hash,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &BlockHash {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn prev_hash_hex(&self) -> String {
        hex::encode(&self.prev_hash)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prev Hash: {}", self.prev_hash_hex())?;
        writeln!(f, "Data: {}", String::from_utf8_lossy(&self.data))?;
        write!(f, "Hash: {}", self.hash_hex())
    }
}
