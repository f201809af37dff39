//! The proof-of-work engine: nonce search and proof checks for a single block.
use crate::block::{Block, BlockHash};
use crate::commitment::{build_commitment, CommitmentHasher};
use crate::config::PowConfig;
use crate::error::{Error, VerifyError};
use crate::stream::MiningHooks;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Winning nonce and the hash it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    pub nonce: u64,
    #[serde(with = "hex::serde")]
    pub hash: BlockHash,
    /// Trials spent, always `nonce + 1`.
    pub trials: u64,
}

impl Solution {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// A mining or validation session over one block.
#[derive(Clone, Debug)]
pub struct ProofOfWork<'a> {
    block: &'a Block,
    config: &'a PowConfig,
    target: Target,
}

impl<'a> ProofOfWork<'a> {
    pub fn new(block: &'a Block, config: &'a PowConfig) -> Result<Self, Error> {
        config.validate()?;
        let target = config.target()?;
        Ok(Self {
            block,
            config,
            target,
        })
    }

    pub fn block(&self) -> &Block {
        self.block
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Bytes hashed for `nonce`.
    pub fn commitment(&self, nonce: u64) -> Result<Vec<u8>, Error> {
        build_commitment(
            self.config.framing,
            &self.block.prev_hash,
            &self.block.data,
            nonce,
            self.config.difficulty,
        )
    }

    pub fn compute_hash(&self, nonce: u64) -> Result<BlockHash, Error> {
        let commitment = self.commitment(nonce)?;
        Ok(Sha256::digest(&commitment).into())
    }

    /// Try nonces `0, 1, 2, ...` until one hashes below the target.
    ///
    /// The order is fixed, so mining the same block under the same config
    /// always returns the same solution.
    pub fn mine(&self, hooks: &MiningHooks) -> Result<Solution, Error> {
        let limit = self.config.trial_limit();
        let interval = self.config.report_interval;
        let hasher = CommitmentHasher::new(
            self.config.framing,
            &self.block.prev_hash,
            &self.block.data,
            self.config.difficulty,
        );

        log::debug!(
            "mining {} byte payload at difficulty {} (~{:.0} expected trials)",
            self.block.data.len(),
            self.target.difficulty(),
            self.target.expected_trials()
        );
        hooks.begin();

        for nonce in 0..limit {
            if hooks.should_stop() {
                log::warn!("mining cancelled after {nonce} trials");
                hooks.report(nonce, None);
                return Err(Error::Cancelled { trials: nonce });
            }

            let hash = hasher.hash(nonce)?;
            let trials = nonce + 1;

            if self.target.is_met_by(&hash) {
                hooks.report(trials, Some(nonce));
                log::debug!("found nonce {nonce} -> {}", hex::encode(hash));
                return Ok(Solution {
                    nonce,
                    hash,
                    trials,
                });
            }

            if trials % interval == 0 {
                log::trace!("{trials} trials, last hash {}", hex::encode(hash));
                hooks.report(trials, None);
            }
        }

        log::warn!("nonce space exhausted after {limit} trials");
        hooks.report(limit, None);
        Err(Error::Exhausted { trials: limit })
    }

    /// Whether the block's own nonce reproduces a hash below the target.
    ///
    /// The stored hash is not consulted.
    pub fn meets_target(&self) -> bool {
        match self.compute_hash(self.block.nonce) {
            Ok(hash) => self.target.is_met_by(&hash),
            Err(err) => {
                log::debug!("rejecting block: {err}");
                false
            }
        }
    }

    /// Whether the stored hash equals the recomputed one.
    pub fn hash_is_consistent(&self) -> bool {
        matches!(self.compute_hash(self.block.nonce), Ok(hash) if hash == self.block.hash)
    }

    /// Proof-of-work check by recomputation alone, same as [`Self::meets_target`].
    pub fn validate(&self) -> bool {
        self.meets_target()
    }

    /// Full integrity check: the stored hash is reproducible and satisfies the target.
    pub fn verify(&self) -> Result<(), VerifyError> {
        let hash = self
            .compute_hash(self.block.nonce)
            .map_err(|_| VerifyError::NonceOutOfRange(self.block.nonce))?;
        if hash != self.block.hash {
            return Err(VerifyError::HashMismatch);
        }
        if !self.target.is_met_by(&hash) {
            return Err(VerifyError::InsufficientWork);
        }
        Ok(())
    }
}

/// Mine `block` under `config` with no hooks attached.
pub fn mine(block: &Block, config: &PowConfig) -> Result<Solution, Error> {
    ProofOfWork::new(block, config)?.mine(&MiningHooks::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::Framing;
    use crate::config::PowConfigBuilder;
    use crate::stream::{MiningProgress, StopFlag};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn easy(difficulty: u32) -> PowConfig {
        PowConfigBuilder::default()
            .difficulty(difficulty)
            .build_validated()
            .unwrap()
    }

    fn finalize(block: &Block, solution: Solution) -> Block {
        Block::from_parts(
            block.data.clone(),
            block.prev_hash.clone(),
            solution.nonce,
            solution.hash,
        )
    }

    #[test]
    fn mining_is_deterministic() {
        let config = easy(10);
        let block = Block::candidate(b"payload".to_vec(), vec![7u8; 32]);
        let first = mine(&block, &config).unwrap();
        let second = mine(&block, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.trials, first.nonce + 1);
    }

    #[test]
    fn winning_nonce_is_the_smallest_acceptable_one() {
        let config = easy(8);
        let block = Block::candidate(b"ordered".to_vec(), Vec::new());
        let pow = ProofOfWork::new(&block, &config).unwrap();
        let solution = pow.mine(&MiningHooks::default()).unwrap();

        assert!(pow.target().is_met_by(&solution.hash));
        for nonce in 0..solution.nonce {
            let hash = pow.compute_hash(nonce).unwrap();
            assert!(!pow.target().is_met_by(&hash), "nonce {nonce} should fail");
        }
    }

    #[test]
    fn mined_block_validates_and_verifies() {
        let config = easy(10);
        let candidate = Block::candidate(b"valid".to_vec(), vec![1, 2, 3]);
        let block = finalize(&candidate, mine(&candidate, &config).unwrap());
        let pow = ProofOfWork::new(&block, &config).unwrap();
        assert!(pow.validate());
        assert!(pow.meets_target());
        assert!(pow.hash_is_consistent());
        assert_eq!(pow.verify(), Ok(()));
    }

    #[test]
    fn validate_ignores_a_forged_hash_but_verify_catches_it() {
        let config = easy(10);
        let candidate = Block::candidate(b"forged".to_vec(), Vec::new());
        let mut block = finalize(&candidate, mine(&candidate, &config).unwrap());
        block.hash = [0u8; 32];

        let pow = ProofOfWork::new(&block, &config).unwrap();
        assert!(pow.validate());
        assert!(!pow.hash_is_consistent());
        assert_eq!(pow.verify(), Err(VerifyError::HashMismatch));
    }

    #[test]
    fn tampering_with_payload_or_link_is_detected() {
        let config = easy(12);
        let candidate = Block::candidate(b"tamper me".to_vec(), vec![0x5a; 32]);
        let block = finalize(&candidate, mine(&candidate, &config).unwrap());

        let mut data_tampered = block.clone();
        data_tampered.data[0] ^= 0x01;
        let pow = ProofOfWork::new(&data_tampered, &config).unwrap();
        assert!(!pow.hash_is_consistent());
        assert!(pow.verify().is_err());

        let mut link_tampered = block.clone();
        link_tampered.prev_hash[31] ^= 0x80;
        let pow = ProofOfWork::new(&link_tampered, &config).unwrap();
        assert!(!pow.hash_is_consistent());
        assert!(pow.verify().is_err());
    }

    #[test]
    fn verify_reports_insufficient_work_at_higher_difficulty() {
        let low = easy(4);
        let candidate = Block::candidate(b"cheap".to_vec(), Vec::new());
        let solution = mine(&candidate, &low).unwrap();
        let block = finalize(&candidate, solution);

        // Difficulty is part of the commitment, so a stricter config recomputes a
        // different hash entirely.
        let high = easy(200);
        let pow = ProofOfWork::new(&block, &high).unwrap();
        assert!(!pow.meets_target());
        assert_eq!(pow.verify(), Err(VerifyError::HashMismatch));

        let mut rehashed = block.clone();
        rehashed.hash = pow.compute_hash(block.nonce).unwrap();
        let pow = ProofOfWork::new(&rehashed, &high).unwrap();
        assert_eq!(pow.verify(), Err(VerifyError::InsufficientWork));
    }

    #[test]
    fn unencodable_nonce_is_invalid_not_fatal() {
        let config = easy(8);
        let block = Block::from_parts(b"x".to_vec(), Vec::new(), u64::MAX, [0u8; 32]);
        let pow = ProofOfWork::new(&block, &config).unwrap();
        assert!(!pow.validate());
        assert!(!pow.hash_is_consistent());
        assert_eq!(pow.verify(), Err(VerifyError::NonceOutOfRange(u64::MAX)));
        assert_eq!(
            pow.commitment(u64::MAX),
            Err(Error::Encoding { nonce: u64::MAX })
        );
    }

    #[test]
    fn exhaustion_is_reported() {
        let config = PowConfigBuilder::default()
            .difficulty(256)
            .max_trials(16)
            .build_validated()
            .unwrap();
        let block = Block::candidate(b"hopeless".to_vec(), Vec::new());
        assert_eq!(mine(&block, &config), Err(Error::Exhausted { trials: 16 }));
    }

    #[test]
    fn stop_flag_cancels_the_search() {
        let config = easy(64);
        let block = Block::candidate(b"stop".to_vec(), Vec::new());
        let stop = Arc::new(StopFlag::new());
        stop.force_stop();
        let hooks = MiningHooks::default().with_stop(stop);
        let pow = ProofOfWork::new(&block, &config).unwrap();
        assert_eq!(pow.mine(&hooks), Err(Error::Cancelled { trials: 0 }));
    }

    #[test]
    fn hooks_observe_without_changing_the_result() {
        let config = PowConfigBuilder::default()
            .difficulty(8)
            .report_interval(1)
            .build_validated()
            .unwrap();
        let block = Block::candidate(b"observed".to_vec(), Vec::new());
        let progress = Arc::new(AtomicU64::new(0));
        let (tx, rx) = flume::unbounded();
        let hooks = MiningHooks::default()
            .with_progress(progress.clone())
            .with_events(tx);

        let pow = ProofOfWork::new(&block, &config).unwrap();
        let observed = pow.mine(&hooks).unwrap();
        assert_eq!(observed, mine(&block, &config).unwrap());
        assert_eq!(progress.load(Ordering::SeqCst), observed.trials);

        let events: Vec<MiningProgress> = rx.try_iter().collect();
        assert_eq!(events.len() as u64, observed.trials);
        assert_eq!(
            events.last(),
            Some(&MiningProgress {
                trials: observed.trials,
                found: Some(observed.nonce)
            })
        );
    }

    #[test]
    fn framing_changes_the_proof() {
        let block = Block::candidate(b"framed".to_vec(), vec![9u8; 32]);
        let prefixed = easy(8);
        let concatenated = PowConfig {
            framing: Framing::Concatenated,
            ..prefixed.clone()
        };
        let a = ProofOfWork::new(&block, &prefixed).unwrap();
        let b = ProofOfWork::new(&block, &concatenated).unwrap();
        assert_ne!(a.compute_hash(0).unwrap(), b.compute_hash(0).unwrap());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PowConfig {
            difficulty: 0,
            ..PowConfig::default()
        };
        let block = Block::candidate(Vec::new(), Vec::new());
        assert!(matches!(
            ProofOfWork::new(&block, &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
