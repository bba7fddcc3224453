use std::{
    collections::VecDeque,
    fmt::{self, Write as _},
    str::FromStr,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BlockType;

/// Source of successive [`BlockType`]s for a game.
pub trait PieceGenerator: Send {
    fn next_block(&mut self) -> BlockType;
}

/// 128-bit seed for deterministic piece generation.
///
/// Serialized as a 32-character hex string. The same seed always yields the
/// same piece sequence for a given [`PieceRule`].
///
/// # Example
///
/// ```
/// use neatris_engine::PieceSeed;
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// assert_ne!(seed.derive(0), seed.derive(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Derives the seed of the `index`-th game created from this seed.
    #[must_use]
    pub fn derive(self, index: u64) -> Self {
        const MIX: u128 = 0x9e37_79b9_7f4a_7c15_f39c_c060_5ced_c835;
        let base = u128::from_be_bytes(self.0);
        let mixed = base ^ u128::from(index).wrapping_add(1).wrapping_mul(MIX);
        Self(mixed.to_be_bytes())
    }

    fn to_hex(self) -> String {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").expect("writing to a String cannot fail");
        hex_str
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {input:?} (expected 32 hex characters)")]
pub struct ParseSeedError {
    input: String,
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Policy used to pick successive pieces.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceRule {
    /// Each piece drawn independently and uniformly.
    #[default]
    Uniform,
    /// Shuffled bags containing each of the 7 kinds once.
    Bag7,
    /// Fixed cyclic sequence; the seed is ignored.
    Sequence(Vec<BlockType>),
}

impl PieceRule {
    /// Builds a generator for this rule.
    ///
    /// # Panics
    ///
    /// Panics if the rule is an empty [`PieceRule::Sequence`].
    #[must_use]
    pub fn build(&self, seed: PieceSeed) -> Box<dyn PieceGenerator> {
        match self {
            PieceRule::Uniform => Box::new(RandomPieceGenerator::with_seed(seed)),
            PieceRule::Bag7 => Box::new(BagPieceGenerator::with_seed(seed)),
            PieceRule::Sequence(blocks) => Box::new(SequencePieceGenerator::new(blocks.clone())),
        }
    }
}

/// Draws every piece uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomPieceGenerator {
    rng: Pcg32,
}

impl RandomPieceGenerator {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl PieceGenerator for RandomPieceGenerator {
    fn next_block(&mut self) -> BlockType {
        self.rng.random()
    }
}

/// 7-bag randomizer: each run of seven pieces contains every kind once.
#[derive(Debug, Clone)]
pub struct BagPieceGenerator {
    rng: Pcg32,
    bag: VecDeque<BlockType>,
}

impl BagPieceGenerator {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(BlockType::LEN),
        }
    }
}

impl PieceGenerator for BagPieceGenerator {
    fn next_block(&mut self) -> BlockType {
        if self.bag.is_empty() {
            let mut new_bag = BlockType::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
        self.bag.pop_front().expect("bag was just refilled")
    }
}

/// Repeats a fixed list of pieces forever.
#[derive(Debug, Clone)]
pub struct SequencePieceGenerator {
    blocks: Vec<BlockType>,
    next: usize,
}

impl SequencePieceGenerator {
    /// # Panics
    ///
    /// Panics if `blocks` is empty.
    #[must_use]
    pub fn new(blocks: Vec<BlockType>) -> Self {
        assert!(!blocks.is_empty(), "piece sequence must not be empty");
        Self { blocks, next: 0 }
    }
}

impl PieceGenerator for SequencePieceGenerator {
    fn next_block(&mut self) -> BlockType {
        let block = self.blocks[self.next];
        self.next = (self.next + 1) % self.blocks.len();
        block
    }
}
