//! Error types for mesh parsing, validation, and scene emission.

use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for the conversion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input geometry file.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Structurally valid input that violates a semantic constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while decoding OBJ or STL input.
///
/// Every variant carries a line number (text formats) or byte offset
/// (binary / grammar-level failures) locating the problem.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed record: wrong field count, bad face reference, missing name.
    #[error("line {line}: {message}")]
    Record {
        /// 1-based line number.
        line: u64,
        /// Description of what was malformed.
        message: String,
    },

    /// A field that should be numeric failed to parse.
    #[error("line {line}: invalid number {token:?}")]
    Number {
        /// 1-based line number.
        line: u64,
        /// The offending token.
        token: String,
    },

    /// A face reference resolved outside its element list.
    #[error("line {line}: {kind} index {index} out of range (list has {len} entries)")]
    Index {
        /// 1-based line number.
        line: u64,
        /// Which element list the reference targets.
        kind: &'static str,
        /// The raw (signed, 1-based) index from the file.
        index: i64,
        /// Length of the targeted list at resolution time.
        len: usize,
    },

    /// ASCII STL input did not match the solid/facet grammar.
    #[error("byte {offset}: {message}")]
    Grammar {
        /// Byte offset where matching stopped.
        offset: usize,
        /// Description of the expected construct.
        message: String,
    },

    /// Binary STL payload length disagrees with the declared triangle count.
    #[error(
        "binary STL declares {declared} triangles ({expected} payload bytes) but {actual} bytes remain"
    )]
    TriangleCount {
        /// Triangle count from the header.
        declared: u32,
        /// Bytes actually present after the header.
        actual: usize,
        /// Bytes implied by the declared count.
        expected: usize,
    },

    /// Input too short to hold an STL header.
    #[error("file too short to be a valid STL ({len} bytes)")]
    Truncated {
        /// Total input length.
        len: usize,
    },
}

impl ParseError {
    /// Create a `Record` error with the given message.
    pub fn record(line: u64, message: impl Into<String>) -> Self {
        Self::Record {
            line,
            message: message.into(),
        }
    }
}

/// Errors raised by post-parse validation and planning.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The mesh has no vertices; bounds and camera framing are undefined.
    #[error("mesh contains no vertices")]
    EmptyMesh,

    /// Camera distance multiplier must be strictly positive.
    #[error("camera distance multiplier must be positive, got {value}")]
    NonPositiveDistance {
        /// The rejected multiplier.
        value: f64,
    },

    /// A triangle references an element outside its list.
    #[error("triangle {triangle}: {kind} index {index} out of range (list has {len} entries)")]
    IndexOutOfRange {
        /// Index of the offending triangle.
        triangle: usize,
        /// Which element list the reference targets.
        kind: &'static str,
        /// The out-of-range index.
        index: u32,
        /// Length of the targeted list.
        len: usize,
    },

    /// Lighting preset name not in the closed preset set.
    #[error("unknown lighting preset {name:?}")]
    UnknownPreset {
        /// The rejected name.
        name: String,
    },
}
