//! # Serde module for Sketch
//!
//! This module provides serde-based (serialization and deserialization) features for
//! `Sketch`, reusing the versioned wire format from [`crate::codec`].
//!
//! Human-readable formats (e.g. JSON) receive the base64 text form as a plain string, so a
//! serialized sketch looks the same whether it came from serde or from an aggregate function.
//! Binary formats receive the raw wire bytes.
//!
//! Deserialization runs the same validation as [`crate::Sketch::deserialize`], so a malformed
//! payload is reported as a serde error instead of producing a partial sketch.
use std::fmt::Formatter;

use serde::de::{Error, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec;
use crate::sketch::Sketch;

impl Serialize for Sketch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&codec::encode_base64(self))
        } else {
            serializer.serialize_bytes(&codec::encode(self))
        }
    }
}

impl<'de> Deserialize<'de> for Sketch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(SketchVisitor)
        } else {
            deserializer.deserialize_bytes(SketchVisitor)
        }
    }
}

/// Visitor accepting either the base64 text or the raw wire bytes
struct SketchVisitor;

impl<'de> Visitor<'de> for SketchVisitor {
    type Value = Sketch;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str("a base64 encoded sketch or serialized sketch bytes")
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        codec::decode_base64(v).map_err(E::custom)
    }

    fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        codec::decode(v).map_err(E::custom)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut data = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(byte) = seq.next_element::<u8>()? {
            data.push(byte);
        }
        codec::decode(&data).map_err(A::Error::custom)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0; "empty set")]
    #[test_case(1; "single element")]
    #[test_case(2; "two distinct elements")]
    #[test_case(100; "hundred distinct elements")]
    #[test_case(10000; "ten thousand distinct elements")]
    fn test_serde(n: usize) {
        let mut original = Sketch::default();

        for i in 0..n {
            let item = format!("item{}", i);
            original.add(item.as_bytes());
        }

        let serialized = serde_json::to_string(&original).expect("serialization failed");
        assert_eq!(serialized, format!("\"{}\"", original.to_base64()));

        let deserialized: Sketch =
            serde_json::from_str(&serialized).expect("deserialization failed");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_deserialize_byte_array() {
        let mut original = Sketch::new(4).unwrap();
        original.add(b"a");
        let json = serde_json::to_string(&original.serialize()).unwrap();

        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let deserialized: Sketch = (&mut deserializer)
            .deserialize_seq(SketchVisitor)
            .expect("deserialization failed");
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let invalid_json = "{ invalid_json_string }";
        let result: Result<Sketch, _> = serde_json::from_str(invalid_json);

        assert!(
            result.is_err(),
            "Deserialization should fail for invalid JSON"
        );
    }

    #[test_case("\"\""; "empty string")]
    #[test_case("\"AQQAAAECAAEBAQMAAQEBAQ==\""; "truncated sketch")]
    #[test_case("\"AgQAAAECAAEBAQMAAQEBAQIE\""; "unknown format tag")]
    #[test_case("12345"; "number")]
    #[test_case("[1, 4, 0]"; "byte array in human readable format")]
    fn test_failed_deserialization(input: &str) {
        let result: Result<Sketch, _> = serde_json::from_str(input);
        assert!(result.is_err());
    }
}
