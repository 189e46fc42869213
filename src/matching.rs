//! Impedance-match figures of merit at a single frequency.
//!
//! The evaluator picks the measured sample nearest the requested frequency
//! (no interpolation, ties resolved towards the lower frequency) and derives
//! |Γ|, return loss and VSWR from its S11. A perfect match and a reflection at
//! or above unity are valid outcomes and show up as `+inf` in the report
//! rather than as errors.

use std::fmt;

use crate::constants::{hz_to_ghz, DEFAULT_REFERENCE_IMPEDANCE, GOOD_MATCH_DB, MODERATE_MATCH_DB};
use crate::dataset::{validate_samples, AntennaDataset, Sample};
use crate::errors::InvalidDataError;
use crate::math::{amplitude_db, CScalar, Scalar};
use crate::sweep::nearest_index_by;

/// Coarse grade of a port match, from |S11| in dB.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    /// |S11| below the good threshold.
    Good,
    /// |S11| below the moderate threshold.
    Moderate,
    /// Physical reflection above both thresholds.
    Poor,
    /// |Γ| ≥ 1: the port reflects everything or the data is noisy.
    NonPhysical,
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Good => "Good impedance matching",
            Self::Moderate => "Moderate impedance matching",
            Self::Poor => "Poor impedance matching",
            Self::NonPhysical => "Unmatched (|S11| >= 1, non-physical)",
        };
        f.write_str(text)
    }
}

/// Figures of merit derived from the sample nearest a queried frequency.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    /// Frequency that was asked for, in Hz.
    pub target_frequency: Scalar,
    /// Frequency of the selected sample, in Hz.
    pub frequency: Scalar,
    /// Index of the selected sample.
    pub index: usize,
    /// Selected complex reflection coefficient Γ.
    pub reflection: CScalar,
    /// |Γ|.
    pub reflection_magnitude: Scalar,
    /// −20·log10|Γ|; `+inf` for a perfect match.
    #[cfg_attr(feature = "serde", serde(with = "extended_float"))]
    pub return_loss_db: Scalar,
    /// (1+|Γ|)/(1−|Γ|); `+inf` when |Γ| ≥ 1.
    #[cfg_attr(feature = "serde", serde(with = "extended_float"))]
    pub vswr: Scalar,
    /// 20·log10|Γ|; `-inf` for a perfect match.
    #[cfg_attr(feature = "serde", serde(with = "extended_float"))]
    pub s11_db: Scalar,
    /// arg(Γ) in degrees.
    pub phase_deg: Scalar,
    /// Impedance seen into the port for the evaluator's reference impedance.
    #[cfg_attr(feature = "serde", serde(with = "extended_float::complex"))]
    pub input_impedance: CScalar,
    /// False when |Γ| ≥ 1.
    pub physical: bool,
    /// Grade from |S11| in dB.
    pub quality: MatchQuality,
}

/// Serde adapters writing non-finite floats as `"inf"`, `"-inf"` or `"NaN"`.
///
/// JSON has no literal for them and `serde_json` would emit `null`, which
/// does not read back as `f64`.
#[cfg(feature = "serde")]
mod extended_float {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::math::{CScalar, Scalar};

    struct Extended(Scalar);

    impl Serialize for Extended {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let v = self.0;
            if v.is_finite() {
                serializer.serialize_f64(v)
            } else if v.is_nan() {
                serializer.serialize_str("NaN")
            } else if v > 0.0 {
                serializer.serialize_str("inf")
            } else {
                serializer.serialize_str("-inf")
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(Scalar),
        Text(String),
    }

    impl<'de> Deserialize<'de> for Extended {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            match Repr::deserialize(deserializer)? {
                Repr::Number(v) => Ok(Self(v)),
                Repr::Text(text) => match text.as_str() {
                    "inf" => Ok(Self(Scalar::INFINITY)),
                    "-inf" => Ok(Self(Scalar::NEG_INFINITY)),
                    "NaN" => Ok(Self(Scalar::NAN)),
                    other => Err(D::Error::invalid_value(
                        Unexpected::Str(other),
                        &"a number, \"inf\", \"-inf\" or \"NaN\"",
                    )),
                },
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &Scalar, serializer: S) -> Result<S::Ok, S::Error> {
        Extended(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
        Extended::deserialize(deserializer).map(|e| e.0)
    }

    /// Same encoding for both parts of a complex value, as `[re, im]`.
    pub mod complex {
        use super::*;

        pub fn serialize<S: Serializer>(value: &CScalar, serializer: S) -> Result<S::Ok, S::Error> {
            (Extended(value.re), Extended(value.im)).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CScalar, D::Error> {
            let (re, im) = <(Extended, Extended)>::deserialize(deserializer)?;
            Ok(CScalar::new(re.0, im.0))
        }
    }
}

impl MatchReport {
    /// True when the selected sample reflects nothing.
    #[must_use]
    pub fn is_perfect_match(&self) -> bool {
        self.reflection_magnitude == 0.0
    }
}

fn fmt_finite(value: Scalar, precision: usize) -> String {
    if value.is_finite() {
        format!("{value:.precision$}")
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frequency: {:.3} GHz", hz_to_ghz(self.frequency))?;
        writeln!(f, "S11 Magnitude: {} dB", fmt_finite(self.s11_db, 2))?;
        writeln!(f, "S11 Phase: {:.2} degrees", self.phase_deg)?;
        writeln!(f, "|Gamma|: {:.4}", self.reflection_magnitude)?;
        writeln!(f, "Return Loss: {} dB", fmt_finite(self.return_loss_db, 2))?;
        writeln!(f, "VSWR: {}", fmt_finite(self.vswr, 3))?;
        writeln!(
            f,
            "Input Impedance: {} {:+.2}j ohm",
            fmt_finite(self.input_impedance.re, 2),
            self.input_impedance.im
        )?;
        write!(f, "{}", self.quality)
    }
}

/// Return loss in dB for a reflection magnitude; `+inf` when `magnitude == 0`.
#[must_use]
pub fn return_loss_db(magnitude: Scalar) -> Scalar {
    if magnitude == 0.0 {
        Scalar::INFINITY
    } else {
        -amplitude_db(magnitude)
    }
}

/// VSWR for a reflection magnitude; `+inf` when `magnitude >= 1`.
#[must_use]
pub fn vswr(magnitude: Scalar) -> Scalar {
    if magnitude >= 1.0 {
        Scalar::INFINITY
    } else {
        (1.0 + magnitude) / (1.0 - magnitude)
    }
}

/// Impedance corresponding to reflection `gamma` against real reference `z0`.
///
/// Γ = 1 (open circuit) maps to `+inf + 0j`.
#[must_use]
pub fn impedance_from_reflection(gamma: CScalar, z0: Scalar) -> CScalar {
    let one = CScalar::new(1.0, 0.0);
    let den = one - gamma;
    if den.norm() == 0.0 {
        return CScalar::new(Scalar::INFINITY, 0.0);
    }
    CScalar::new(z0, 0.0) * (one + gamma) / den
}

/// Stateless evaluator parameterised by reference impedance and grading thresholds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpedanceMatchEvaluator {
    /// Real reference impedance Z₀ in ohms.
    pub reference_impedance: Scalar,
    /// |S11| dB threshold for [`MatchQuality::Good`].
    pub good_threshold_db: Scalar,
    /// |S11| dB threshold for [`MatchQuality::Moderate`].
    pub moderate_threshold_db: Scalar,
}

impl Default for ImpedanceMatchEvaluator {
    fn default() -> Self {
        Self {
            reference_impedance: DEFAULT_REFERENCE_IMPEDANCE,
            good_threshold_db: GOOD_MATCH_DB,
            moderate_threshold_db: MODERATE_MATCH_DB,
        }
    }
}

impl ImpedanceMatchEvaluator {
    /// Creates an evaluator for reference impedance `z0` with default thresholds.
    #[must_use]
    pub fn new(reference_impedance: Scalar) -> Self {
        Self {
            reference_impedance,
            ..Self::default()
        }
    }

    /// Overrides the grading thresholds (dB, both negative, `good < moderate`).
    #[must_use]
    pub fn with_thresholds(mut self, good_db: Scalar, moderate_db: Scalar) -> Self {
        self.good_threshold_db = good_db;
        self.moderate_threshold_db = moderate_db;
        self
    }

    /// Grades a reflection magnitude.
    #[must_use]
    pub fn grade(&self, magnitude: Scalar) -> MatchQuality {
        if magnitude >= 1.0 {
            return MatchQuality::NonPhysical;
        }
        let db = amplitude_db(magnitude);
        if db < self.good_threshold_db {
            MatchQuality::Good
        } else if db < self.moderate_threshold_db {
            MatchQuality::Moderate
        } else {
            MatchQuality::Poor
        }
    }

    /// Validates `samples` and reports the match at the sample nearest `target_frequency`.
    pub fn evaluate(
        &self,
        samples: &[Sample],
        target_frequency: Scalar,
    ) -> Result<MatchReport, InvalidDataError> {
        validate_samples(samples)?;
        self.report(samples, target_frequency)
    }

    /// Reports the match for an already validated dataset.
    pub fn evaluate_dataset(
        &self,
        dataset: &AntennaDataset,
        target_frequency: Scalar,
    ) -> Result<MatchReport, InvalidDataError> {
        self.report(dataset.samples(), target_frequency)
    }

    fn report(&self, samples: &[Sample], target_frequency: Scalar) -> Result<MatchReport, InvalidDataError> {
        if !target_frequency.is_finite() || target_frequency <= 0.0 {
            return Err(InvalidDataError::InvalidTarget(target_frequency));
        }
        let index = nearest_index_by(samples, target_frequency, |s| s.frequency)
            .ok_or(InvalidDataError::Empty)?;
        let selected = samples[index];
        let gamma = selected.s11;
        let magnitude = gamma.norm();
        Ok(MatchReport {
            target_frequency,
            frequency: selected.frequency,
            index,
            reflection: gamma,
            reflection_magnitude: magnitude,
            return_loss_db: return_loss_db(magnitude),
            vswr: vswr(magnitude),
            s11_db: amplitude_db(magnitude),
            phase_deg: gamma.arg().to_degrees(),
            input_impedance: impedance_from_reflection(gamma, self.reference_impedance),
            physical: magnitude < 1.0,
            quality: self.grade(magnitude),
        })
    }
}

/// Evaluates `samples` at `target_frequency` with a 50 Ω reference and default grading.
pub fn evaluate(samples: &[Sample], target_frequency: Scalar) -> Result<MatchReport, InvalidDataError> {
    ImpedanceMatchEvaluator::default().evaluate(samples, target_frequency)
}
