//! HyperLogLog sketch estimates number of distinct elements in the stream or
//! dataset using `M = 2^P` one-byte registers, where `P` is the precision in
//! [4..16] range chosen at construction.
//!
//! # Data-structure design rationale
//!
//! ## Portable state
//! - Registers are kept as a plain dense `u8` array, one byte per register,
//!   which is also exactly how they are laid out on the wire.
//! - Hashing is pinned to `wyhash` with a fixed seed (see [`crate::hash`]) so
//!   sketches built by different processes or hosts merge losslessly.
//!
//! ## Union
//! - Merge is a pointwise register maximum: commutative, associative and
//!   idempotent, so partial sketches may be combined in any order or as a tree.
//!
//! ## Accuracy
//! - Estimates use the classic HyperLogLog harmonic mean with linear counting
//!   for the small range and the `2^64` large range correction.
//!   - Expected error:
//!     P = 10: 1.04 / sqrt(2^10) = 3.25%
//!     P = 12: 1.04 / sqrt(2^12) = 1.62%
//!     P = 14: 1.04 / sqrt(2^14) = 0.81%
//!     P = 16: 1.04 / sqrt(2^16) = 0.41%

use std::fmt::{Debug, Formatter};

use crate::codec;
use crate::error::{ParseError, SketchError};
use crate::hash::{self, locate_hash};

/// Smallest supported precision
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision
pub const MAX_PRECISION: u8 = 16;
/// Precision used by [`Sketch::default`] and the aggregate functions
pub const DEFAULT_PRECISION: u8 = 12;

/// `2^64` as used by the large range correction
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// HyperLogLog sketch with a fixed precision.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sketch {
    /// Number of bits used for register indices
    pub(crate) precision: u8,
    /// `2^precision` registers holding the maximum observed rank
    pub(crate) registers: Box<[u8]>,
}

impl Sketch {
    /// Creates new empty `Sketch` with `2^precision` registers
    pub fn new(precision: u8) -> Result<Self, SketchError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(SketchError::InvalidPrecision { precision });
        }

        Ok(Self {
            precision,
            registers: vec![0u8; 1 << precision].into_boxed_slice(),
        })
    }

    /// Build sketch from already validated registers
    pub(crate) fn from_registers(precision: u8, registers: Vec<u8>) -> Self {
        debug_assert_eq!(registers.len(), 1 << precision);
        Self {
            precision,
            registers: registers.into_boxed_slice(),
        }
    }

    /// Return precision of the sketch
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Return number of registers
    #[inline]
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Return registers in index order
    #[inline]
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Return whether no element has been added or merged since creation or
    /// the last [`Sketch::clear`]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Add a byte string element
    #[inline]
    pub fn add(&mut self, element: &[u8]) {
        self.add_hash(hash::hash(element));
    }

    /// Add an element by its pinned 64-bit hash (see [`crate::hash::hash`])
    #[inline]
    pub fn add_hash(&mut self, hash: u64) {
        let (idx, rank) = locate_hash(hash, self.precision);
        let register = &mut self.registers[idx as usize];
        if rank > *register {
            *register = rank;
        }
    }

    /// Reset every register to zero
    #[inline]
    pub fn clear(&mut self) {
        self.registers.fill(0);
    }

    /// Merge `rhs` into `self` as a union of both input sets
    pub fn merge(&mut self, rhs: &Sketch) -> Result<(), SketchError> {
        if self.precision != rhs.precision {
            return Err(SketchError::PrecisionMismatch {
                expected: self.precision,
                actual: rhs.precision,
            });
        }

        for (lhs, &rhs) in self.registers.iter_mut().zip(rhs.registers.iter()) {
            if rhs > *lhs {
                *lhs = rhs;
            }
        }
        Ok(())
    }

    /// Return cardinality estimate, rounded to the nearest integer
    #[inline]
    pub fn estimate(&self) -> u64 {
        // `as` saturates at `u64::MAX` near the top of the large range
        (self.corrected_estimate() + 0.5) as u64
    }

    /// Return number of registers still set to zero
    #[inline]
    pub fn zeros(&self) -> usize {
        self.registers.iter().filter(|&&r| r == 0).count()
    }

    /// Return harmonic mean estimate without any range correction
    fn raw_estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| 1.0 / ((1u64 << r) as f64))
            .sum();
        alpha(self.registers.len()) * m * m / sum
    }

    /// Return estimate with small and large range corrections applied
    fn corrected_estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let estimate = self.raw_estimate();

        if estimate <= 2.5 * m {
            match self.zeros() {
                0 => estimate,
                zeros => m * (m / zeros as f64).ln(),
            }
        } else if estimate > TWO_POW_64 / 30.0 {
            -TWO_POW_64 * (1.0 - estimate / TWO_POW_64).ln()
        } else {
            estimate
        }
    }

    /// Serialize into the versioned binary wire format
    #[inline]
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Deserialize from the versioned binary wire format
    #[inline]
    pub fn deserialize(data: &[u8]) -> Result<Self, ParseError> {
        codec::decode(data)
    }

    /// Serialize into printable base64 text
    #[inline]
    pub fn to_base64(&self) -> String {
        codec::encode_base64(self)
    }

    /// Deserialize from printable base64 text
    #[inline]
    pub fn from_base64(text: impl AsRef<[u8]>) -> Result<Self, ParseError> {
        codec::decode_base64(text)
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            registers: vec![0u8; 1 << DEFAULT_PRECISION].into_boxed_slice(),
        }
    }
}

impl<'a> Extend<&'a [u8]> for Sketch {
    fn extend<I: IntoIterator<Item = &'a [u8]>>(&mut self, iter: I) {
        iter.into_iter().for_each(|element| self.add(element));
    }
}

impl Debug for Sketch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ precision: {}, estimate: {}, zeros: {} }}",
            self.precision,
            self.estimate(),
            self.zeros()
        )
    }
}

/// Parameter for bias correction
#[inline]
fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}
