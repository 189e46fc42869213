//! Frequency sweep utilities and trace post-processing helpers.

use num_complex::Complex;

use crate::math::Scalar;

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Index of the item whose frequency is nearest `target` in an ascending sequence.
///
/// Ties resolve to the lower frequency. Returns `None` for an empty slice.
#[must_use]
pub fn nearest_index_by<T, F>(items: &[T], target: Scalar, frequency: F) -> Option<usize>
where
    F: Fn(&T) -> Scalar,
{
    if items.is_empty() {
        return None;
    }
    let upper = items.partition_point(|item| frequency(item) < target);
    if upper == 0 {
        return Some(0);
    }
    if upper == items.len() {
        return Some(items.len() - 1);
    }
    let below = target - frequency(&items[upper - 1]);
    let above = frequency(&items[upper]) - target;
    Some(if below <= above { upper - 1 } else { upper })
}

/// Magnitude in dB (20*log10(|x|)), clamping very small values so traces stay finite.
#[must_use]
pub fn mag_db(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    const MIN: Scalar = 1e-300;
    values
        .into_iter()
        .map(|v| 20.0 * (v.norm().max(MIN)).log10())
        .collect()
}

/// Phase in radians of complex sequence.
#[must_use]
pub fn phase_rad(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    values.into_iter().map(|v| v.arg()).collect()
}

/// Phase in degrees of complex sequence.
#[must_use]
pub fn phase_deg(values: impl IntoIterator<Item = Complex<Scalar>>) -> Vec<Scalar> {
    phase_rad(values).into_iter().map(|r| r.to_degrees()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_basic() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn nearest_index_by_prefers_lower_on_ties() {
        let f = [1.0, 3.0, 4.0];
        assert_eq!(nearest_index_by(&f, 2.0, |x| *x), Some(0));
        assert_eq!(nearest_index_by(&f, 2.1, |x| *x), Some(1));
        assert_eq!(nearest_index_by(&f, 3.0, |x| *x), Some(1));
        assert_eq!(nearest_index_by(&f, 0.5, |x| *x), Some(0));
        assert_eq!(nearest_index_by(&f, 10.0, |x| *x), Some(2));
        assert_eq!(nearest_index_by(&[] as &[Scalar], 1.0, |x| *x), None);
    }

    #[test]
    fn phase_of_unit_phasors() {
        let x = vec![Complex::new(1.0, 0.0), Complex::new(0.0, 1.0), Complex::new(-1.0, 0.0)];
        let db = mag_db(x.clone());
        let p = phase_deg(x);
        assert!(db.iter().all(|d| d.abs() < 1e-12));
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 90.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 180.0, epsilon = 1e-12);
    }

    #[test]
    fn mag_db_clamps_zero_to_finite_floor() {
        let db = mag_db(vec![Complex::new(0.0, 0.0), Complex::new(0.1, 0.0)]);
        assert!(db[0].is_finite());
        assert_relative_eq!(db[0], -6000.0, epsilon = 1e-9);
        assert_relative_eq!(db[1], -20.0, epsilon = 1e-12);
    }
}
