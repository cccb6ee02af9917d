//! `hll-aggregate` is a Rust crate for estimating the number of distinct elements in large, possibly
//! distributed, streams using HyperLogLog sketches.
//!
//! Sketches hash elements with a pinned hash function and serialize to a versioned, portable wire
//! format, so partial sketches built on different hosts can be merged bit-for-bit. The
//! [`aggregate`] module exposes the sketch as `HLL_CREATE`, `HLL_COMPUTE`, `HLL_MERGE` and
//! `HLL_MERGE_COMPUTE` aggregate functions for a SQL host.
//!
//! ```
//! use hll_aggregate::Sketch;
//!
//! let mut lhs = Sketch::new(12).unwrap();
//! let mut rhs = Sketch::new(12).unwrap();
//! lhs.add(b"apple");
//! rhs.add(b"banana");
//!
//! let rhs = Sketch::from_base64(rhs.to_base64()).unwrap();
//! lhs.merge(&rhs).unwrap();
//! assert_eq!(lhs.estimate(), 2);
//! ```
pub mod aggregate;
pub mod codec;
pub mod error;
pub mod hash;
#[cfg(feature = "with_serde")]
mod serde;
pub mod sketch;

pub use aggregate::{Aggregate, AggregateFunction, AggregateKind, AggregateOutput, ArgType};
pub use error::{AggregateError, ParseError, SketchError};
pub use sketch::{Sketch, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION};
