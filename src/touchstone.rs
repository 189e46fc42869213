//! Touchstone sNp import.
//!
//! Supports version 1 files: an option line `# <unit> S <format> R <z0>`,
//! `!` comments, and data records in RI, MA or DB form. Records may wrap
//! across lines, which is how files with more than two ports are laid out.
//! Two-port files store each record as `S11 S21 S12 S22`; every other port
//! count is row-major. Noise-parameter blocks trailing a two-port sweep are
//! ignored.

use std::path::Path;
use std::str::FromStr;

use nalgebra::DMatrix;
use num_complex::Complex;
use thiserror::Error;
use tracing::debug;

use crate::errors::AntennaMatchError;
use crate::math::{db_to_amplitude, polar_deg, CScalar, Scalar};
use crate::sweep::nearest_index_by;

/// Errors raised while parsing Touchstone contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TouchstoneError {
    /// An option line token is not a unit, parameter, format or `R <z0>`.
    #[error("line {line}: unrecognised option `{token}`")]
    InvalidOption {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// The file holds a parameter kind other than S.
    #[error("line {line}: {kind}-parameters are not supported, only S")]
    UnsupportedParameter {
        /// 1-based line number.
        line: usize,
        /// Parameter letter from the option line.
        kind: String,
    },
    /// Touchstone 2.0 keyword lines are not handled.
    #[error("line {line}: unsupported keyword `{keyword}`")]
    UnsupportedKeyword {
        /// 1-based line number.
        line: usize,
        /// Keyword including brackets.
        keyword: String,
    },
    /// A data token did not parse as a number.
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A data record does not hold `1 + 2 * n^2` values.
    #[error("line {line}: malformed record with {values} values")]
    MalformedRecord {
        /// 1-based line number where the record starts.
        line: usize,
        /// Number of values collected.
        values: usize,
    },
    /// The file contains no data records.
    #[error("missing data")]
    MissingData,
}

/// Frequency unit declared on the option line.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    /// Hertz.
    Hz,
    /// Kilohertz.
    KHz,
    /// Megahertz.
    MHz,
    /// Gigahertz, the Touchstone default.
    #[default]
    GHz,
}

impl FrequencyUnit {
    /// Multiplier converting a value in this unit to hertz.
    #[must_use]
    pub const fn multiplier(self) -> Scalar {
        match self {
            Self::Hz => 1.0,
            Self::KHz => 1.0e3,
            Self::MHz => 1.0e6,
            Self::GHz => 1.0e9,
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hz" => Ok(Self::Hz),
            "khz" => Ok(Self::KHz),
            "mhz" => Ok(Self::MHz),
            "ghz" => Ok(Self::GHz),
            _ => Err(()),
        }
    }
}

/// Numeric layout of each complex value pair.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    /// Real, imaginary.
    RealImaginary,
    /// Linear magnitude, angle in degrees. The Touchstone default.
    #[default]
    MagnitudeAngle,
    /// Magnitude in dB, angle in degrees.
    DecibelAngle,
}

impl DataFormat {
    /// Converts one value pair into a complex number.
    #[must_use]
    pub fn to_complex(self, a: Scalar, b: Scalar) -> CScalar {
        match self {
            Self::RealImaginary => Complex::new(a, b),
            Self::MagnitudeAngle => polar_deg(a, b),
            Self::DecibelAngle => polar_deg(db_to_amplitude(a), b),
        }
    }
}

impl FromStr for DataFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ri" => Ok(Self::RealImaginary),
            "ma" => Ok(Self::MagnitudeAngle),
            "db" => Ok(Self::DecibelAngle),
            _ => Err(()),
        }
    }
}

/// Settings carried by the `#` option line.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionLine {
    /// Frequency unit of the first column.
    pub unit: FrequencyUnit,
    /// Layout of value pairs.
    pub format: DataFormat,
    /// Reference impedance in ohms.
    pub z0: Scalar,
}

impl Default for OptionLine {
    fn default() -> Self {
        Self {
            unit: FrequencyUnit::default(),
            format: DataFormat::default(),
            z0: 50.0,
        }
    }
}

impl OptionLine {
    /// Parses the text after `#`.
    pub fn parse(text: &str, line: usize) -> Result<Self, TouchstoneError> {
        let mut options = Self::default();
        let mut tokens = text.split_whitespace();
        while let Some(token) = tokens.next() {
            if let Ok(unit) = token.parse::<FrequencyUnit>() {
                options.unit = unit;
            } else if let Ok(format) = token.parse::<DataFormat>() {
                options.format = format;
            } else if token.eq_ignore_ascii_case("r") {
                let value = tokens.next().ok_or_else(|| TouchstoneError::InvalidOption {
                    line,
                    token: token.to_string(),
                })?;
                options.z0 = value.parse().map_err(|_| TouchstoneError::InvalidOption {
                    line,
                    token: value.to_string(),
                })?;
            } else if token.eq_ignore_ascii_case("s") {
                continue;
            } else if ["y", "z", "g", "h"].iter().any(|k| token.eq_ignore_ascii_case(k)) {
                return Err(TouchstoneError::UnsupportedParameter {
                    line,
                    kind: token.to_ascii_uppercase(),
                });
            } else {
                return Err(TouchstoneError::InvalidOption {
                    line,
                    token: token.to_string(),
                });
            }
        }
        Ok(options)
    }
}

/// Representation of an N-port network as frequency-dependent S-parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SParameterNetwork {
    /// Number of ports.
    pub port_count: usize,
    /// Reference impedance in ohms.
    pub z0: Scalar,
    /// Frequencies in Hz, in file order.
    pub frequencies: Vec<Scalar>,
    /// For each frequency index f, an (n x n) matrix of S-parameters.
    pub sparams: Vec<DMatrix<CScalar>>,
}

impl SParameterNetwork {
    /// Number of frequency points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when no frequency points were read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Returns the S-parameter matrix at the frequency nearest `freq_hz`.
    #[must_use]
    pub fn s_at(&self, freq_hz: Scalar) -> Option<&DMatrix<CScalar>> {
        nearest_index_by(&self.frequencies, freq_hz, |f| *f).map(|idx| &self.sparams[idx])
    }

    /// Iterates over S11 at each frequency.
    pub fn s11(&self) -> impl Iterator<Item = CScalar> + '_ {
        self.sparams.iter().map(|m| m[(0, 0)])
    }
}

/// Port count from an `.sNp` extension, e.g. `antenna3.s2p` gives 2.
#[must_use]
pub fn ports_from_extension(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let digits = ext.strip_prefix('s')?.strip_suffix('p')?;
    digits.parse().ok().filter(|&n| n > 0)
}

fn parse_number(token: &str, line: usize) -> Result<Scalar, TouchstoneError> {
    token.parse().map_err(|_| TouchstoneError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn record_to_matrix(values: &[Scalar], n: usize, format: DataFormat) -> DMatrix<CScalar> {
    let mut m = DMatrix::zeros(n, n);
    for (k, pair) in values.chunks_exact(2).enumerate() {
        let (i, j) = if n == 2 { (k % 2, k / 2) } else { (k / n, k % n) };
        m[(i, j)] = format.to_complex(pair[0], pair[1]);
    }
    m
}

/// Parses Touchstone `contents`.
///
/// `ports` is usually taken from the file extension; when `None`, the port
/// count is inferred from the width of the first record, which only works
/// for one- and two-port files.
pub fn read_touchstone(contents: &str, ports: Option<usize>) -> Result<SParameterNetwork, TouchstoneError> {
    let mut options: Option<OptionLine> = None;
    let mut nports = ports;
    let mut pending: Vec<Scalar> = Vec::new();
    let mut pending_line = 0usize;
    let mut freqs = Vec::new();
    let mut mats = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let l = raw.split('!').next().unwrap_or_default().trim();
        if l.is_empty() {
            continue;
        }
        if let Some(rest) = l.strip_prefix('#') {
            // Only the first option line counts.
            if options.is_none() {
                options = Some(OptionLine::parse(rest, line_no)?);
            }
            continue;
        }
        if l.starts_with('[') {
            let keyword = l.split_whitespace().next().unwrap_or(l);
            return Err(TouchstoneError::UnsupportedKeyword {
                line: line_no,
                keyword: keyword.to_string(),
            });
        }

        let opts = options.unwrap_or_default();
        let toks: Vec<&str> = l.split_whitespace().collect();

        if pending.is_empty() {
            pending_line = line_no;
            if nports.is_none() {
                let pairs = (toks.len() - 1) / 2;
                let n = (pairs as Scalar).sqrt().round() as usize;
                if n == 0 || 1 + 2 * n * n != toks.len() {
                    return Err(TouchstoneError::MalformedRecord {
                        line: line_no,
                        values: toks.len(),
                    });
                }
                nports = Some(n);
            }
            // Two-port noise data: five columns at a frequency not above the last one.
            if nports == Some(2) && toks.len() == 5 {
                if let Some(&last) = freqs.last() {
                    let f = parse_number(toks[0], line_no)? * opts.unit.multiplier();
                    if f <= last {
                        debug!(line = line_no, "noise parameter block reached, stopping");
                        break;
                    }
                }
            }
        }

        for tok in &toks {
            pending.push(parse_number(tok, line_no)?);
        }

        let n = nports.unwrap_or(1);
        let width = 1 + 2 * n * n;
        if pending.len() > width {
            return Err(TouchstoneError::MalformedRecord {
                line: pending_line,
                values: pending.len(),
            });
        }
        if pending.len() == width {
            freqs.push(pending[0] * opts.unit.multiplier());
            mats.push(record_to_matrix(&pending[1..], n, opts.format));
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(TouchstoneError::MalformedRecord {
            line: pending_line,
            values: pending.len(),
        });
    }
    let port_count = match nports {
        Some(n) if !freqs.is_empty() => n,
        _ => return Err(TouchstoneError::MissingData),
    };
    let z0 = options.unwrap_or_default().z0;
    debug!(port_count, points = freqs.len(), z0, "parsed touchstone data");

    Ok(SParameterNetwork {
        port_count,
        z0,
        frequencies: freqs,
        sparams: mats,
    })
}

/// Reads and parses a Touchstone file, taking the port count from its extension.
pub fn read_touchstone_file(path: impl AsRef<Path>) -> Result<SParameterNetwork, AntennaMatchError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    Ok(read_touchstone(&contents, ports_from_extension(path))?)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const TWO_PORT_RI: &str = "\
! antenna bench capture
# Hz S RI R 50
2300000000 0.1 0.0  0.9 0.0  0.9 0.0  0.2 0.0
2400000000 0.05 0.0 0.95 0.0 0.95 0.0 0.1 0.0 ! centre
2500000000 0.2 0.0  0.8 0.0  0.8 0.0  0.3 0.0
";

    #[test]
    fn parses_two_port_real_imaginary() {
        let net = read_touchstone(TWO_PORT_RI, Some(2)).expect("valid");
        assert_eq!(net.port_count, 2);
        assert_eq!(net.len(), 3);
        assert_eq!(net.frequencies, vec![2.3e9, 2.4e9, 2.5e9]);
        let s11: Vec<_> = net.s11().collect();
        assert_relative_eq!(s11[1].re, 0.05, epsilon = 1e-12);
        assert_relative_eq!(net.sparams[0][(1, 1)].re, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn two_port_columns_are_s11_s21_s12_s22() {
        let text = "# GHz S RI R 50\n1.0 0.1 0 0.2 0 0.3 0 0.4 0\n";
        let net = read_touchstone(text, None).unwrap();
        let m = &net.sparams[0];
        assert_relative_eq!(m[(0, 0)].re, 0.1);
        assert_relative_eq!(m[(1, 0)].re, 0.2);
        assert_relative_eq!(m[(0, 1)].re, 0.3);
        assert_relative_eq!(m[(1, 1)].re, 0.4);
        assert_eq!(net.frequencies[0], 1.0e9);
    }

    #[test]
    fn magnitude_angle_and_db_formats() {
        let ma = read_touchstone("# MHz S MA R 75\n2400 0.5 90\n", None).unwrap();
        assert_eq!(ma.port_count, 1);
        assert_eq!(ma.z0, 75.0);
        assert_eq!(ma.frequencies[0], 2.4e9);
        let s = ma.sparams[0][(0, 0)];
        assert_relative_eq!(s.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.im, 0.5, epsilon = 1e-12);

        let db = read_touchstone("# khz s db r 50\n1 -20 180\n", None).unwrap();
        let s = db.sparams[0][(0, 0)];
        assert_relative_eq!(s.re, -0.1, epsilon = 1e-12);
        assert_eq!(db.frequencies[0], 1.0e3);
    }

    #[test]
    fn defaults_to_ghz_magnitude_angle() {
        let net = read_touchstone("2.4 0.25 0\n", Some(1)).unwrap();
        assert_relative_eq!(net.frequencies[0], 2.4e9, max_relative = 1e-12);
        assert_relative_eq!(net.sparams[0][(0, 0)].re, 0.25, epsilon = 1e-12);
        assert_eq!(net.z0, 50.0);
    }

    #[test]
    fn three_port_records_wrap_across_lines() {
        let text = "\
# Hz S RI R 50
1e9 0.11 0 0.12 0 0.13 0
    0.21 0 0.22 0 0.23 0
    0.31 0 0.32 0 0.33 0
";
        let net = read_touchstone(text, Some(3)).unwrap();
        assert_eq!(net.len(), 1);
        assert_relative_eq!(net.sparams[0][(0, 2)].re, 0.13);
        assert_relative_eq!(net.sparams[0][(2, 0)].re, 0.31);

        assert!(matches!(
            read_touchstone(text, None),
            Err(TouchstoneError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn noise_block_is_ignored() {
        let text = format!("{TWO_PORT_RI}2000000000 1.5 0.4 45 0.3\n2500000000 1.7 0.5 60 0.35\n");
        let net = read_touchstone(&text, Some(2)).unwrap();
        assert_eq!(net.len(), 3);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(read_touchstone("! nothing\n", Some(2)), Err(TouchstoneError::MissingData));
        assert!(matches!(
            read_touchstone("# Hz Z RI R 50\n", Some(2)),
            Err(TouchstoneError::UnsupportedParameter { line: 1, .. })
        ));
        assert!(matches!(
            read_touchstone("# Hz S XY R 50\n", Some(2)),
            Err(TouchstoneError::InvalidOption { line: 1, .. })
        ));
        assert!(matches!(
            read_touchstone("# Hz S RI R 50\n1e9 0.1 abc 0 0 0 0 0 0\n", Some(2)),
            Err(TouchstoneError::InvalidNumber { line: 2, .. })
        ));
        assert!(matches!(
            read_touchstone("# Hz S RI R 50\n1e9 0.1 0 0 0\n", Some(2)),
            Err(TouchstoneError::MalformedRecord { line: 2, values: 5 })
        ));
        assert!(matches!(
            read_touchstone("[Version] 2.0\n", None),
            Err(TouchstoneError::UnsupportedKeyword { line: 1, .. })
        ));
    }

    #[test]
    fn nearest_matrix_lookup() {
        let net = read_touchstone(TWO_PORT_RI, Some(2)).unwrap();
        let m = net.s_at(2.44e9).unwrap();
        assert_relative_eq!(m[(0, 0)].re, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn extension_gives_port_count() {
        assert_eq!(ports_from_extension(Path::new("antenna1.s2p")), Some(2));
        assert_eq!(ports_from_extension(Path::new("dut.S4P")), Some(4));
        assert_eq!(ports_from_extension(Path::new("notes.txt")), None);
        assert_eq!(ports_from_extension(Path::new("x.s0p")), None);
    }
}
