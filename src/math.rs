//! Shared numerical primitives anchored on `num-complex`.

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for reflection coefficients.
pub type CScalar = num_complex::Complex<Scalar>;

/// Decibel value of a linear voltage ratio, `20 * log10(x)`.
///
/// Returns `-inf` for zero, which callers rely on for the perfect-match case.
#[must_use]
pub fn amplitude_db(ratio: Scalar) -> Scalar {
    20.0 * ratio.log10()
}

/// Linear voltage ratio of a decibel value.
#[must_use]
pub fn db_to_amplitude(db: Scalar) -> Scalar {
    10f64.powf(db / 20.0)
}

/// Builds a phasor from magnitude and angle in degrees.
#[must_use]
pub fn polar_deg(magnitude: Scalar, angle_deg: Scalar) -> CScalar {
    CScalar::from_polar(magnitude, angle_deg.to_radians())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn amplitude_db_of_half_is_minus_six() {
        assert_relative_eq!(amplitude_db(0.5), -6.020_599_913_279_624, epsilon = 1.0e-12);
        assert_eq!(amplitude_db(0.0), Scalar::NEG_INFINITY);
    }

    #[test]
    fn db_to_amplitude_inverts_amplitude_db() {
        assert_relative_eq!(db_to_amplitude(amplitude_db(0.3)), 0.3, epsilon = 1.0e-12);
    }

    #[test]
    fn polar_deg_places_quadrature_on_imaginary_axis() {
        let z = polar_deg(2.0, 90.0);
        assert_relative_eq!(z.re, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(z.im, 2.0, epsilon = 1.0e-12);
    }
}
