//! Difficulty targets over the 256-bit hash space.
use crate::error::Error;
use crate::BlockHash;

/// Smallest accepted difficulty. Zero would need the unrepresentable target `1 << 256`.
pub const MIN_DIFFICULTY: u32 = 1;
/// Largest accepted difficulty; the target collapses to `1`.
pub const MAX_DIFFICULTY: u32 = 256;

/// The numeric threshold `1 << (256 - difficulty)` stored as a big-endian 256-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    difficulty: u32,
    bytes: [u8; 32],
}

impl Target {
    /// Derive the target for `difficulty` leading zero bits.
    pub fn from_difficulty(difficulty: u32) -> Result<Self, Error> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(Error::InvalidConfig(format!(
                "difficulty must be within {MIN_DIFFICULTY}..={MAX_DIFFICULTY}, got {difficulty}"
            )));
        }
        let shift = (256 - difficulty) as usize;
        let mut bytes = [0u8; 32];
        bytes[31 - shift / 8] = 1u8 << (shift % 8);
        Ok(Self { difficulty, bytes })
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Whether `hash`, read as a big-endian unsigned integer, is strictly below the target.
    ///
    /// Fixed-width big-endian arrays compare numerically under lexicographic ordering.
    #[inline]
    pub fn is_met_by(&self, hash: &BlockHash) -> bool {
        hash < &self.bytes
    }

    /// Expected number of trials before a hit, `2^difficulty`.
    pub fn expected_trials(&self) -> f64 {
        2f64.powi(self.difficulty as i32)
    }
}

/// Count leading zero bits of a 32-byte hash.
pub fn leading_zero_bits(hash: &BlockHash) -> u32 {
    let mut count = 0u32;
    for byte in hash {
        if *byte == 0 {
            count += 8;
            continue;
        }
        count += (*byte).leading_zeros();
        break;
    }
    count
}
