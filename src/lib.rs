//! A minimal append-only hash chain secured by SHA-256 proof-of-work.
//!
//! Every [`Block`] commits to the hash of its predecessor. Appending a block
//! requires finding a nonce whose commitment hash, read as a big-endian
//! 256-bit integer, is strictly below `1 << (256 - difficulty)`.
//!
//! ```no_run
//! use powchain::{Chain, ProofOfWork};
//!
//! let mut chain = Chain::init()?;
//! chain.append("First")?;
//! chain.append("Second")?;
//!
//! for block in &chain {
//!     let pow = ProofOfWork::new(block, chain.config())?;
//!     println!("{block}\nPoW: {}", pow.validate());
//! }
//! # Ok::<(), powchain::Error>(())
//! ```
pub mod block;
pub mod chain;
pub mod commitment;
pub mod config;
pub mod error;
pub mod pow;
pub mod stream;
pub mod target;

pub use block::{Block, BlockHash};
pub use chain::{create_block, genesis, Chain, GENESIS_DATA};
pub use commitment::{build_commitment, Framing};
pub use config::{PowConfig, PowConfigBuilder, DEFAULT_DIFFICULTY};
pub use error::{Error, VerifyError};
pub use pow::{mine, ProofOfWork, Solution};
pub use stream::{MiningHooks, MiningProgress, StopFlag};
pub use target::{leading_zero_bits, Target};
