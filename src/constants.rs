//! Reference values used across the crate.
//!
//! ## Match grading
//!
//! The grading thresholds are applied to |S11| in dB. A port reflecting less
//! than a tenth of incident power (−10 dB, VSWR ≈ 1.92) is the usual bench
//! criterion for a "good" antenna match; −6 dB (VSWR ≈ 3.0) is the common
//! acceptance floor for small embedded antennas.

/// Default system reference impedance Z₀ in ohms (Ω).
pub const DEFAULT_REFERENCE_IMPEDANCE: f64 = 50.0;
/// Default analysis frequency in hertz (2.4 GHz ISM band).
pub const DEFAULT_TARGET_FREQUENCY_HZ: f64 = 2.4e9;
/// |S11| in dB below which a match is graded good.
pub const GOOD_MATCH_DB: f64 = -10.0;
/// |S11| in dB below which a match is graded moderate.
pub const MODERATE_MATCH_DB: f64 = -6.0;
/// Hertz per gigahertz.
pub const HZ_PER_GHZ: f64 = 1.0e9;

/// Converts a frequency in hertz to gigahertz.
#[inline]
#[must_use]
pub fn hz_to_ghz(hz: f64) -> f64 {
    hz / HZ_PER_GHZ
}

/// Converts a frequency in gigahertz to hertz.
#[inline]
#[must_use]
pub fn ghz_to_hz(ghz: f64) -> f64 {
    ghz * HZ_PER_GHZ
}
