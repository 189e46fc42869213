//! Shared error types used across submodules.

use thiserror::Error;

use crate::touchstone::TouchstoneError;

/// Raised when a sample sequence or query violates the dataset invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidDataError {
    /// The sample sequence holds no points.
    #[error("sample sequence is empty")]
    Empty,
    /// Frequencies are not strictly increasing at `index`.
    #[error("frequencies must be strictly increasing: sample {index} ({frequency} Hz) follows {previous} Hz")]
    Unsorted {
        /// Position of the offending sample.
        index: usize,
        /// Frequency of the preceding sample.
        previous: f64,
        /// Frequency of the offending sample.
        frequency: f64,
    },
    /// A sample frequency is zero, negative or not finite.
    #[error("sample {index} has invalid frequency {frequency} Hz")]
    InvalidFrequency {
        /// Position of the offending sample.
        index: usize,
        /// Offending frequency.
        frequency: f64,
    },
    /// A sample's S11 has a NaN or infinite component.
    #[error("sample {index} has non-finite S11 {re}{im:+}j")]
    NonFiniteReflection {
        /// Position of the offending sample.
        index: usize,
        /// Real part of S11.
        re: f64,
        /// Imaginary part of S11.
        im: f64,
    },
    /// The queried target frequency is zero, negative or not finite.
    #[error("target frequency must be positive and finite, got {0} Hz")]
    InvalidTarget(f64),
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum AntennaMatchError {
    /// Wraps sample-validation errors.
    #[error(transparent)]
    InvalidData(#[from] InvalidDataError),
    /// Wraps Touchstone parse errors.
    #[error(transparent)]
    Touchstone(#[from] TouchstoneError),
    /// Raised when an analysis configuration is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
    /// Filesystem failures while discovering, reading or exporting files.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
