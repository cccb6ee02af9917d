//! ## Wire format
//! Serialized sketches are self-describing so they can be exchanged between
//! processes, hosts, or other implementations and merged bit-for-bit.
//!
//! Binary layout (format version 1):
//! - data[0]       - format tag, identifies register encoding and hash function
//! - data[1]       - precision `P`
//! - data[2..]     - `2^P` registers, one byte each, in index order
//!
//! The text form is the same bytes as padded standard base64, which takes
//! `4 * ceil((2^P + 2) / 3)` characters and can be stored in ordinary string
//! columns.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ParseError;
use crate::hash::max_rank;
use crate::sketch::{Sketch, MAX_PRECISION, MIN_PRECISION};

/// Format tag for dense one-byte registers hashed with wyhash 0.5, seed 0.
///
/// Any change to [`crate::hash`] must come with a new tag.
pub const FORMAT_TAG: u8 = 0x01;
/// Number of header bytes preceding the registers
pub const HEADER_LEN: usize = 2;

/// Return binary length of a sketch with the given precision
#[inline]
pub const fn encoded_len(precision: u8) -> usize {
    HEADER_LEN + (1 << precision)
}

/// Return base64 text length of a sketch with the given precision
#[inline]
pub const fn encoded_base64_len(precision: u8) -> usize {
    4 * encoded_len(precision).div_ceil(3)
}

/// Encode sketch into binary wire format
pub fn encode(sketch: &Sketch) -> Vec<u8> {
    let mut data = Vec::with_capacity(encoded_len(sketch.precision));
    data.push(FORMAT_TAG);
    data.push(sketch.precision);
    data.extend_from_slice(&sketch.registers);
    data
}

/// Decode sketch from binary wire format.
///
/// The header, the total length, and every register are validated before the
/// sketch is built.
pub fn decode(data: &[u8]) -> Result<Sketch, ParseError> {
    let (tag, precision, registers) = match data {
        [] => return Err(ParseError::Empty),
        [tag, precision, registers @ ..] => (*tag, *precision, registers),
        _ => return Err(ParseError::Truncated { len: data.len() }),
    };

    if tag != FORMAT_TAG {
        return Err(ParseError::UnsupportedFormat { tag });
    }
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(ParseError::InvalidPrecision { precision });
    }

    let expected = encoded_len(precision);
    if data.len() != expected {
        return Err(ParseError::LengthMismatch {
            precision,
            expected,
            actual: data.len(),
        });
    }

    let max_rank = max_rank(precision);
    if let Some((index, &rank)) = registers
        .iter()
        .enumerate()
        .find(|&(_, &rank)| u32::from(rank) > max_rank)
    {
        return Err(ParseError::RegisterOutOfRange {
            index,
            rank,
            max_rank,
        });
    }

    Ok(Sketch::from_registers(precision, registers.to_vec()))
}

/// Encode sketch into padded base64 text
#[inline]
pub fn encode_base64(sketch: &Sketch) -> String {
    STANDARD.encode(encode(sketch))
}

/// Decode sketch from padded base64 text
pub fn decode_base64(text: impl AsRef<[u8]>) -> Result<Sketch, ParseError> {
    let text = text.as_ref();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    decode(&STANDARD.decode(text)?)
}
