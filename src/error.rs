//! Error types returned by sketch construction, merging, decoding, and the
//! aggregate-function layer.

/// Errors raised while constructing or combining sketches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SketchError {
    #[error("precision {precision} is outside the supported range 4..=16")]
    InvalidPrecision { precision: u8 },

    #[error("cannot merge sketches of different precision: expected {expected}, got {actual}")]
    PrecisionMismatch { expected: u8, actual: u8 },
}

/// Errors raised while decoding a serialized sketch.
///
/// Decoding never yields a partially initialized sketch; any of these means
/// the input contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("serialized sketch is empty")]
    Empty,

    #[error("serialized sketch is truncated: {len} bytes is shorter than the header")]
    Truncated { len: usize },

    #[error("unsupported sketch format tag {tag:#04x}")]
    UnsupportedFormat { tag: u8 },

    #[error("serialized sketch declares unsupported precision {precision}")]
    InvalidPrecision { precision: u8 },

    #[error("serialized sketch with precision {precision} must be {expected} bytes, got {actual}")]
    LengthMismatch {
        precision: u8,
        expected: usize,
        actual: usize,
    },

    #[error("register {index} holds rank {rank}, above the maximum {max_rank}")]
    RegisterOutOfRange { index: usize, rank: u8, max_rank: u32 },

    #[error("invalid base64 sketch text: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors reported to the host by the aggregate-function layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("Wrong arguments to {function}();  Must have at least 1 argument")]
    MissingArguments { function: &'static str },

    #[error("Wrong arguments to {function}();  All arguments must be of type string (argument {position} is not)")]
    NonStringArgument {
        function: &'static str,
        position: usize,
    },

    #[error(transparent)]
    Sketch(#[from] SketchError),
}
