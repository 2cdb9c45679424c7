//! Error types for building, saving and loading mosaics.

use std::path::PathBuf;

use thiserror::Error;

/// Construction-time shape or configuration problems.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The X and Y coordinate sequences differ in length.
    #[error("x and y must have the same length (x: {x}, y: {y})")]
    LengthMismatch {
        /// Number of X values.
        x: usize,
        /// Number of Y values.
        y: usize,
    },
    /// The payload sequence does not match the point sequence.
    #[error("payload count {payloads} does not match point count {points}")]
    PayloadMismatch {
        /// Number of points.
        points: usize,
        /// Number of payloads.
        payloads: usize,
    },
    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },
    /// Per-point colors were given for a different number of points.
    #[error("{colors} point colors given for {points} points")]
    PointColorMismatch {
        /// Number of points.
        points: usize,
        /// Number of colors.
        colors: usize,
    },
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Problems found in a saved mosaic while loading it.
#[derive(Debug, Error)]
pub enum CorruptStateError {
    /// The blob is not a mosaic document (bad JSON, missing or mistyped
    /// field).
    #[error("cannot decode mosaic state: {0}")]
    Decode(#[from] serde_json::Error),
    /// Two sequences that must line up have different lengths.
    #[error("field `{field}` has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Offending field.
        field: &'static str,
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        found: usize,
    },
    /// A point index refers past the end of the point sequence.
    #[error("field `{field}` refers to point {index} but only {len} points exist")]
    IndexOutOfRange {
        /// Offending field.
        field: &'static str,
        /// The bad index.
        index: usize,
        /// Number of points.
        len: usize,
    },
    /// A coordinate or size is NaN or infinite.
    #[error("field `{field}` contains a non-finite value")]
    NonFinite {
        /// Offending field.
        field: &'static str,
    },
    /// The stored configuration does not describe a usable figure.
    #[error("stored configuration is invalid: {0}")]
    Config(ValidationError),
}

/// Top-level error for mosaic operations.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Invalid constructor input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Unusable saved state.
    #[error(transparent)]
    CorruptState(#[from] CorruptStateError),
    /// The mosaic could not be encoded for saving.
    #[error("cannot encode mosaic state: {0}")]
    Encode(#[source] serde_json::Error),
    /// Reading or writing a state file failed.
    #[error("i/o error on {path:?}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
