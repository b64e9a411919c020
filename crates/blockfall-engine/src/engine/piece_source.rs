use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplies the kinds of upcoming pieces to a [`Board`](crate::Board).
///
/// The board owns its source, so independent boards never share random state.
pub trait PieceSource: fmt::Debug {
    /// Returns the kind of the next piece.
    fn next_kind(&mut self) -> PieceKind;

    /// Restarts the source from `seed`.
    fn reseed(&mut self, seed: PieceSeed);
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the piece generator. The same seed always produces the
/// same sequence of pieces, which makes rollouts reproducible.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSeed, PieceSource as _, RandomPieces};
///
/// let mut a = RandomPieces::with_seed(PieceSeed::from(42));
/// let mut b = RandomPieces::with_seed(PieceSeed::from(42));
/// for _ in 0..16 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl From<[u8; 16]> for PieceSeed {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error returned when parsing a [`PieceSeed`] from text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("seed must be 32 hex digits, found {_0}")]
    Length(#[error(not(source))] usize),
    #[display("seed contains a non-hex digit")]
    Digit,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    /// Parses the 32 hex digit form produced by `Display`. Either case is
    /// accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::Length(s.len()));
        }
        // from_str_radix would also take a leading `+`
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParsePieceSeedError::Digit);
        }
        u128::from_str_radix(s, 16)
            .map(|n| Self(n.to_be_bytes()))
            .map_err(|_| ParsePieceSeedError::Digit)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Draws each piece kind independently and uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomPieces {
    rng: Pcg32,
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieces {
    /// Creates a source seeded from the thread-local generator.
    ///
    /// For deterministic sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl PieceSource for RandomPieces {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }

    fn reseed(&mut self, seed: PieceSeed) {
        self.rng = Pcg32::from_seed(seed.0);
    }
}

/// Cycles through a fixed list of kinds.
///
/// Useful for scripted games and tests. Reseeding rewinds to the first kind;
/// the seed value itself is ignored.
#[derive(Debug, Clone)]
pub struct SequencePieces {
    kinds: Vec<PieceKind>,
    cursor: usize,
}

impl SequencePieces {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, cursor: 0 }
    }

    /// Repeats a single kind forever.
    #[must_use]
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new([kind])
    }
}

impl PieceSource for SequencePieces {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.cursor];
        self.cursor = (self.cursor + 1) % self.kinds.len();
        kind
    }

    fn reseed(&mut self, _seed: PieceSeed) {
        self.cursor = 0;
    }
}
