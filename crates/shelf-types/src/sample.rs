use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Exclusive upper bound of the sample identifier space (2^24).
pub const SAMPLE_ID_LIMIT: u32 = 1 << 24;

/// Identifier of an allocated sample.
///
/// Sample identifiers are handed out sequentially by a tree store's index and
/// live in the 24-bit range `[0, 16777216)`. Values outside that range cannot
/// be constructed; overflow is a precondition violation, never wrapped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SampleId(u32);

impl SampleId {
    /// The first identifier a fresh store allocates.
    pub const ZERO: Self = Self(0);

    /// The largest representable identifier.
    pub const MAX: Self = Self(SAMPLE_ID_LIMIT - 1);

    /// Create a sample identifier, rejecting values outside the 24-bit range.
    pub fn new(value: u64) -> Result<Self, TypeError> {
        if value >= SAMPLE_ID_LIMIT as u64 {
            return Err(TypeError::SampleIdOutOfRange {
                value,
                limit: SAMPLE_ID_LIMIT,
            });
        }
        Ok(Self(value as u32))
    }

    /// The raw integer value.
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The shard this identifier maps to.
    pub fn shard(&self) -> Shard {
        Shard::from_id(*self)
    }

    /// The identifier immediately after this one, if still in range.
    pub fn next(&self) -> Option<Self> {
        Self::new(self.0 as u64 + 1).ok()
    }
}

impl fmt::Debug for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleId({})", self.0)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for SampleId {
    type Error = TypeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u32> for SampleId {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value as u64)
    }
}

impl From<SampleId> for u64 {
    fn from(id: SampleId) -> Self {
        id.0 as u64
    }
}

/// Big-endian base-256 decomposition of a [`SampleId`].
///
/// Each byte becomes one zero-padded, three-digit decimal path segment, so
/// identifier 257 lives at `000/001/001`. No directory in the tree ever holds
/// more than 256 entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shard([u8; 3]);

impl Shard {
    /// Encode an identifier: `b2 = n mod 256`, then `b1` and `b0` from the
    /// remaining high bits.
    pub fn from_id(id: SampleId) -> Self {
        let mut number = id.value();
        let third = (number % 256) as u8;
        number >>= 8;
        let second = (number % 256) as u8;
        let first = (number >> 8) as u8;
        Self([first, second, third])
    }

    /// Build a shard from its three bytes, most significant first.
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    /// The three bytes, most significant first.
    pub const fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// Decode back to the identifier.
    pub fn to_id(&self) -> SampleId {
        let [first, second, third] = self.0;
        SampleId((((first as u32) << 8) + second as u32) << 8 | third as u32)
    }

    /// The three rendered path segments.
    pub fn segments(&self) -> [String; 3] {
        self.0.map(|byte| format!("{byte:03}"))
    }

    /// Path of this shard relative to a samples directory.
    pub fn relative_path(&self) -> PathBuf {
        self.segments().iter().collect()
    }

    /// Path of this shard under the given samples directory.
    pub fn under(&self, samples: &Path) -> PathBuf {
        samples.join(self.relative_path())
    }

    /// Parse three rendered segments back into a shard.
    ///
    /// Each segment must be exactly three decimal digits with a value below
    /// 256.
    pub fn parse_segments(first: &str, second: &str, third: &str) -> Result<Self, TypeError> {
        Ok(Self([
            parse_segment(first)?,
            parse_segment(second)?,
            parse_segment(third)?,
        ]))
    }
}

fn parse_segment(segment: &str) -> Result<u8, TypeError> {
    if segment.len() != 3 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypeError::InvalidSegment(segment.to_string()));
    }
    segment
        .parse::<u8>()
        .map_err(|_| TypeError::InvalidSegment(segment.to_string()))
}

impl fmt::Debug for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shard({self})")
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second, third] = self.0;
        write!(f, "{first:03}/{second:03}/{third:03}")
    }
}

impl From<SampleId> for Shard {
    fn from(id: SampleId) -> Self {
        Self::from_id(id)
    }
}

impl From<Shard> for SampleId {
    fn from(shard: Shard) -> Self {
        shard.to_id()
    }
}
