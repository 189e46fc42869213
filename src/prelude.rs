//! Convenience re-exports for antenna match analysis.

pub use crate::config::{AnalysisConfig, DEFAULT_FILE_PREFIX};
pub use crate::constants::*;
pub use crate::dataset::{validate_samples, AntennaDataset, Sample};
pub use crate::errors::{AntennaMatchError, InvalidDataError};
pub use crate::io::{
    discover_antenna_files, export_s11_traces, load_antenna_datasets, load_dataset,
    write_match_summary_csv, write_s11_trace_csv,
};
pub use crate::matching::{
    evaluate, impedance_from_reflection, return_loss_db, vswr, ImpedanceMatchEvaluator,
    MatchQuality, MatchReport,
};
pub use crate::math::{CScalar, Scalar};
pub use crate::sweep::{linspace, mag_db, phase_deg};
pub use crate::touchstone::{read_touchstone, read_touchstone_file, SParameterNetwork, TouchstoneError};
