//! Append-only sequence of mined blocks.
use crate::block::{Block, BlockHash};
use crate::config::PowConfig;
use crate::error::{Error, VerifyError};
use crate::pow::ProofOfWork;
use crate::stream::MiningHooks;
use serde::Serialize;

/// Payload of the first block of every chain.
pub const GENESIS_DATA: &[u8] = b"Genesis";

/// Mine a new block on top of `prev_hash`.
pub fn create_block(
    data: impl Into<Vec<u8>>,
    prev_hash: impl Into<Vec<u8>>,
    config: &PowConfig,
    hooks: &MiningHooks,
) -> Result<Block, Error> {
    let mut block = Block::candidate(data.into(), prev_hash.into());
    let solution = ProofOfWork::new(&block, config)?.mine(hooks)?;
    block.nonce = solution.nonce;
    block.hash = solution.hash;
    Ok(block)
}

/// Mine the genesis block: fixed payload, empty predecessor hash.
pub fn genesis(config: &PowConfig, hooks: &MiningHooks) -> Result<Block, Error> {
    create_block(GENESIS_DATA, Vec::new(), config, hooks)
}

/// An in-memory chain that always starts with a genesis block.
#[derive(Debug, Serialize)]
pub struct Chain {
    blocks: Vec<Block>,
    config: PowConfig,
    #[serde(skip)]
    hooks: MiningHooks,
}

impl Chain {
    /// Build a chain with the default configuration.
    pub fn init() -> Result<Self, Error> {
        Self::with_config(PowConfig::default())
    }

    pub fn with_config(config: PowConfig) -> Result<Self, Error> {
        Self::with_hooks(config, MiningHooks::default())
    }

    /// Build a chain whose genesis and later blocks report through `hooks`.
    pub fn with_hooks(config: PowConfig, hooks: MiningHooks) -> Result<Self, Error> {
        config.validate()?;
        let genesis = genesis(&config, &hooks)?;
        log::info!("genesis block mined: {}", genesis.hash_hex());
        Ok(Self {
            blocks: vec![genesis],
            config,
            hooks,
        })
    }

    /// Adopt blocks produced elsewhere, refusing anything that does not verify.
    pub fn from_blocks(blocks: Vec<Block>, config: PowConfig) -> Result<Self, VerifyError> {
        let chain = Self {
            blocks,
            config,
            hooks: MiningHooks::default(),
        };
        chain.verify()?;
        Ok(chain)
    }

    /// Mine `data` on top of the last block and append it.
    ///
    /// On failure the chain is left exactly as it was.
    pub fn append(&mut self, data: impl Into<Vec<u8>>) -> Result<&Block, Error> {
        let prev_hash = self.last().hash.to_vec();
        let block = create_block(data, prev_hash, &self.config, &self.hooks)?;
        log::info!(
            "appended block {} with nonce {}: {}",
            self.blocks.len(),
            block.nonce,
            block.hash_hex()
        );
        self.blocks.push(block);
        Ok(self.last())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// The genesis block.
    pub fn first(&self) -> &Block {
        &self.blocks[0]
    }

    /// The most recent block. Never fails: a chain cannot exist without genesis.
    pub fn last(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn tip_hash(&self) -> &BlockHash {
        &self.last().hash
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    /// Run the proof-of-work check on the block at `index`.
    pub fn validate(&self, index: usize) -> Option<bool> {
        let block = self.blocks.get(index)?;
        ProofOfWork::new(block, &self.config)
            .map(|pow| pow.validate())
            .ok()
    }

    /// Check genesis placement, hash linkage, and the proof of every block.
    pub fn verify(&self) -> Result<(), VerifyError> {
        self.config.validate()?;
        let genesis = self.blocks.first().ok_or(VerifyError::MissingGenesis)?;
        if !genesis.is_genesis() {
            return Err(VerifyError::MissingGenesis);
        }

        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 && block.prev_hash != self.blocks[index - 1].hash {
                return Err(VerifyError::BrokenLink { index });
            }
            ProofOfWork::new(block, &self.config)?
                .verify()
                .map_err(|err| VerifyError::InvalidBlock {
                    index,
                    source: Box::new(err),
                })?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
