/// Errors raised while configuring or running the miner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("nonce {nonce} cannot be encoded as a signed 64-bit integer")]
    Encoding { nonce: u64 },
    #[error("mining failed: no acceptable hash after {trials} trials")]
    Exhausted { trials: u64 },
    #[error("mining cancelled after {trials} trials")]
    Cancelled { trials: u64 },
}

/// Reasons a block or a chain fails verification.
///
/// These are outcomes for the caller to inspect, never fatal conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("hash does not satisfy the difficulty target")]
    InsufficientWork,
    #[error("stored hash does not match the recomputed hash")]
    HashMismatch,
    #[error("nonce {0} is outside the encodable range")]
    NonceOutOfRange(u64),
    #[error("first block is not a genesis block")]
    MissingGenesis,
    #[error("block {index} does not reference the hash of its predecessor")]
    BrokenLink { index: usize },
    #[error("cannot verify under an invalid config: {0}")]
    Config(#[from] Error),
    #[error("block {index} failed verification: {source}")]
    InvalidBlock {
        index: usize,
        #[source]
        source: Box<VerifyError>,
    },
}
