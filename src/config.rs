use crate::commitment::Framing;
use crate::error::Error;
use crate::target::{Target, MAX_DIFFICULTY, MIN_DIFFICULTY};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Required leading zero bits when nothing else is configured.
pub const DEFAULT_DIFFICULTY: u32 = 18;

/// Highest nonce space the search walks, `0..i64::MAX`.
pub const NONCE_CEILING: u64 = i64::MAX as u64;

/// Trials between two progress reports.
pub const DEFAULT_REPORT_INTERVAL: u64 = 1 << 16;

/// Proof-of-work parameters shared by mining and validation.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[builder(pattern = "owned")]
#[serde(default)]
pub struct PowConfig {
    /// Required leading zero bits; the target is `1 << (256 - difficulty)`.
    #[builder(default = "DEFAULT_DIFFICULTY")]
    pub difficulty: u32,
    /// Upper bound on nonces tried before mining reports exhaustion.
    #[builder(default = "NONCE_CEILING")]
    pub max_trials: u64,
    #[builder(default)]
    pub framing: Framing,
    #[builder(default = "DEFAULT_REPORT_INTERVAL")]
    pub report_interval: u64,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_trials: NONCE_CEILING,
            framing: Framing::default(),
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

impl PowConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(Error::InvalidConfig(format!(
                "difficulty must be within {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"
            )));
        }
        if self.max_trials == 0 {
            return Err(Error::InvalidConfig("max_trials must be >= 1".into()));
        }
        if self.report_interval == 0 {
            return Err(Error::InvalidConfig("report_interval must be >= 1".into()));
        }
        Ok(())
    }

    pub fn target(&self) -> Result<Target, Error> {
        Target::from_difficulty(self.difficulty)
    }

    /// Number of nonces the search may try, capped at the signed 64-bit range.
    pub fn trial_limit(&self) -> u64 {
        self.max_trials.min(NONCE_CEILING)
    }
}

impl PowConfigBuilder {
    pub fn build_validated(self) -> Result<PowConfig, Error> {
        let config = self
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
