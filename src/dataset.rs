//! Frequency-indexed S11 measurements for a single antenna.

use crate::errors::InvalidDataError;
use crate::math::{CScalar, Scalar};
use crate::touchstone::SParameterNetwork;

/// One measured frequency point: frequency in hertz and the complex S11 there.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Frequency in Hz.
    pub frequency: Scalar,
    /// Reflection coefficient at port 1.
    pub s11: CScalar,
}

impl Sample {
    /// Creates a sample from a frequency in hertz and a complex S11.
    #[must_use]
    pub const fn new(frequency: Scalar, s11: CScalar) -> Self {
        Self { frequency, s11 }
    }
}

/// Checks that `samples` is non-empty, every frequency is positive and finite,
/// every S11 is finite, and frequencies strictly increase.
pub fn validate_samples(samples: &[Sample]) -> Result<(), InvalidDataError> {
    if samples.is_empty() {
        return Err(InvalidDataError::Empty);
    }
    for (index, sample) in samples.iter().enumerate() {
        if !sample.frequency.is_finite() || sample.frequency <= 0.0 {
            return Err(InvalidDataError::InvalidFrequency {
                index,
                frequency: sample.frequency,
            });
        }
        if !sample.s11.re.is_finite() || !sample.s11.im.is_finite() {
            return Err(InvalidDataError::NonFiniteReflection {
                index,
                re: sample.s11.re,
                im: sample.s11.im,
            });
        }
    }
    for (index, pair) in samples.windows(2).enumerate() {
        if pair[1].frequency <= pair[0].frequency {
            return Err(InvalidDataError::Unsorted {
                index: index + 1,
                previous: pair[0].frequency,
                frequency: pair[1].frequency,
            });
        }
    }
    Ok(())
}

/// Named, immutable S11 sweep for one antenna.
///
/// Construction validates the samples, so every `AntennaDataset` holds at
/// least one sample, finite S11 values and strictly increasing frequencies.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaDataset {
    name: String,
    samples: Vec<Sample>,
}

impl AntennaDataset {
    /// Creates a dataset after validating `samples`.
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Result<Self, InvalidDataError> {
        validate_samples(&samples)?;
        Ok(Self {
            name: name.into(),
            samples,
        })
    }

    /// Extracts the port-1 reflection trace from a parsed network.
    pub fn from_network(
        name: impl Into<String>,
        network: &SParameterNetwork,
    ) -> Result<Self, InvalidDataError> {
        let samples = network
            .frequencies
            .iter()
            .zip(network.s11())
            .map(|(&frequency, s11)| Sample::new(frequency, s11))
            .collect();
        Self::new(name, samples)
    }

    /// Returns the dataset label (usually the file stem).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the validated samples in ascending frequency order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterates over sample frequencies in hertz.
    pub fn frequencies(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.samples.iter().map(|s| s.frequency)
    }

    /// Iterates over the S11 values.
    pub fn s11(&self) -> impl Iterator<Item = CScalar> + '_ {
        self.samples.iter().map(|s| s.s11)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed dataset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest and highest sample frequency in hertz.
    #[must_use]
    pub fn span(&self) -> (Scalar, Scalar) {
        let first = self.samples.first().map_or(0.0, |s| s.frequency);
        let last = self.samples.last().map_or(0.0, |s| s.frequency);
        (first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touchstone::read_touchstone;

    fn sample(f: Scalar, re: Scalar) -> Sample {
        Sample::new(f, CScalar::new(re, 0.0))
    }

    #[test]
    fn accepts_strictly_increasing_sweep() {
        let ds = AntennaDataset::new(
            "antenna1",
            vec![sample(2.3e9, 0.1), sample(2.4e9, 0.05), sample(2.5e9, 0.2)],
        )
        .expect("valid");
        assert_eq!(ds.name(), "antenna1");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.span(), (2.3e9, 2.5e9));
        assert_eq!(ds.frequencies().collect::<Vec<_>>(), vec![2.3e9, 2.4e9, 2.5e9]);
    }

    #[test]
    fn rejects_empty_sweep() {
        assert_eq!(AntennaDataset::new("a", Vec::new()), Err(InvalidDataError::Empty));
    }

    #[test]
    fn rejects_unsorted_and_duplicate_frequencies() {
        let err = validate_samples(&[sample(2.5e9, 0.1), sample(2.3e9, 0.1)]).unwrap_err();
        assert_eq!(
            err,
            InvalidDataError::Unsorted {
                index: 1,
                previous: 2.5e9,
                frequency: 2.3e9
            }
        );
        assert!(matches!(
            validate_samples(&[sample(1.0e9, 0.1), sample(1.0e9, 0.2)]),
            Err(InvalidDataError::Unsorted { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_reflection() {
        let bad = [sample(1.0e9, 0.1), Sample::new(2.0e9, CScalar::new(0.2, Scalar::INFINITY))];
        assert!(matches!(
            validate_samples(&bad),
            Err(InvalidDataError::NonFiniteReflection { index: 1, .. })
        ));

        // f64 parsing accepts `NaN`, so a capture can carry one into the network.
        let network = read_touchstone("# Hz S RI R 50\n2.4e9 NaN 0\n", Some(1)).expect("parses");
        assert!(matches!(
            AntennaDataset::from_network("antenna1", &network),
            Err(InvalidDataError::NonFiniteReflection { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_or_nan_frequency() {
        assert!(matches!(
            validate_samples(&[sample(0.0, 0.1)]),
            Err(InvalidDataError::InvalidFrequency { index: 0, .. })
        ));
        assert!(matches!(
            validate_samples(&[sample(1.0, 0.1), sample(Scalar::NAN, 0.1)]),
            Err(InvalidDataError::InvalidFrequency { index: 1, .. })
        ));
    }
}
