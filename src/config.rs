//! Settings for a directory-wide antenna analysis.

use std::path::PathBuf;

use crate::constants::{
    DEFAULT_REFERENCE_IMPEDANCE, DEFAULT_TARGET_FREQUENCY_HZ, GOOD_MATCH_DB, MODERATE_MATCH_DB,
};
use crate::errors::AntennaMatchError;
use crate::matching::ImpedanceMatchEvaluator;
use crate::math::Scalar;

/// File-name prefix used by bench captures (`antenna1.s2p`, `antenna2.s2p`, ...).
pub const DEFAULT_FILE_PREFIX: &str = "antenna";

/// Metadata describing one analysis run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Directory searched for `.s2p` files.
    pub directory: PathBuf,
    /// Only files whose name starts with this prefix are loaded.
    pub file_prefix: String,
    /// Frequency at which the match is evaluated, in Hz.
    pub target_frequency: Scalar,
    /// Real reference impedance in ohms.
    pub reference_impedance: Scalar,
    /// |S11| dB threshold for a good match.
    pub good_threshold_db: Scalar,
    /// |S11| dB threshold for a moderate match.
    pub moderate_threshold_db: Scalar,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AnalysisConfig {
    /// Creates a configuration for `directory` with 2.4 GHz / 50 Ω defaults.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            target_frequency: DEFAULT_TARGET_FREQUENCY_HZ,
            reference_impedance: DEFAULT_REFERENCE_IMPEDANCE,
            good_threshold_db: GOOD_MATCH_DB,
            moderate_threshold_db: MODERATE_MATCH_DB,
        }
    }

    /// Sets the evaluation frequency in Hz.
    #[must_use]
    pub fn with_target_frequency(mut self, hz: Scalar) -> Self {
        self.target_frequency = hz;
        self
    }

    /// Sets the reference impedance in ohms.
    #[must_use]
    pub fn with_reference_impedance(mut self, ohms: Scalar) -> Self {
        self.reference_impedance = ohms;
        self
    }

    /// Sets the file-name prefix.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Sets the grading thresholds in dB.
    #[must_use]
    pub fn with_thresholds(mut self, good_db: Scalar, moderate_db: Scalar) -> Self {
        self.good_threshold_db = good_db;
        self.moderate_threshold_db = moderate_db;
        self
    }

    /// Checks that frequencies, impedance and thresholds are usable.
    pub fn validate(&self) -> Result<(), AntennaMatchError> {
        if !self.target_frequency.is_finite() || self.target_frequency <= 0.0 {
            return Err(AntennaMatchError::Config(format!(
                "target frequency must be positive, got {} Hz",
                self.target_frequency
            )));
        }
        if !self.reference_impedance.is_finite() || self.reference_impedance <= 0.0 {
            return Err(AntennaMatchError::Config(format!(
                "reference impedance must be positive, got {} ohm",
                self.reference_impedance
            )));
        }
        if !(self.good_threshold_db < self.moderate_threshold_db && self.moderate_threshold_db <= 0.0) {
            return Err(AntennaMatchError::Config(format!(
                "thresholds must satisfy good < moderate <= 0 dB, got {} / {}",
                self.good_threshold_db, self.moderate_threshold_db
            )));
        }
        Ok(())
    }

    /// Builds the evaluator described by this configuration.
    #[must_use]
    pub fn evaluator(&self) -> ImpedanceMatchEvaluator {
        ImpedanceMatchEvaluator::new(self.reference_impedance)
            .with_thresholds(self.good_threshold_db, self.moderate_threshold_db)
    }
}
