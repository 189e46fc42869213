#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Reference values and match-grading thresholds.
pub mod constants;
/// Shared numerical primitives.
pub mod math;
/// Sequence helpers for magnitude, dB and phase traces.
pub mod sweep;
/// Validated frequency-indexed S11 datasets.
pub mod dataset;
/// Impedance-match evaluation at a target frequency.
pub mod matching;
/// Touchstone sNp reader.
pub mod touchstone;
/// Analysis configuration.
pub mod config;
/// Antenna file discovery and CSV trace export.
pub mod io;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
