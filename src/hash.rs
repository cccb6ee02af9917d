//! ## Hash/Rank engine
//! Maps an arbitrary byte string onto a HyperLogLog register index and rank.
//!
//! The hash function and bit layout below are part of the serialized format
//! (see [`crate::codec::FORMAT_TAG`]). Two sketches only merge correctly when
//! both sides produced identical `(index, rank)` pairs for identical input, so
//! nothing here may change without bumping the format tag.
//!
//! Hash layout for precision `P` (64-bit wyhash, seed `0`):
//! - bits 63..64-P     - register index
//! - bits 63-P..0      - rank source: leading zeros + 1, saturating at `64 - P`

use wyhash::wyhash;

/// Width of the hash in bits
pub const HASH_BITS: u32 = 64;
/// Seed passed to `wyhash`, frozen as part of the wire format
pub const HASH_SEED: u64 = 0;

/// Return the pinned 64-bit hash of `element`
#[inline]
pub fn hash(element: &[u8]) -> u64 {
    wyhash(element, HASH_SEED)
}

/// Return register `(index, rank)` for `element` at the given precision
#[inline]
pub fn locate(element: &[u8], precision: u8) -> (u32, u8) {
    locate_hash(hash(element), precision)
}

/// Return register `(index, rank)` for an already computed hash.
///
/// `precision` must be in `1..=32`, which [`crate::Sketch`] guarantees.
#[inline]
pub fn locate_hash(hash: u64, precision: u8) -> (u32, u8) {
    let p = u32::from(precision);
    let idx = (hash >> (HASH_BITS - p)) as u32;
    let rank = ((hash << p).leading_zeros() + 1).min(max_rank(precision));
    (idx, rank as u8)
}

/// Largest rank a register can hold for the given precision
#[inline]
pub const fn max_rank(precision: u8) -> u32 {
    HASH_BITS - precision as u32
}
