//! Small statistical helpers used across the crate.

// =============================================================================
// Statistical Utilities
// =============================================================================

/// Arithmetic mean, guarded so that an empty slice yields 0.
///
/// The divisor is `max(1, n)`.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len().max(1) as f64
}

/// Median of a slice.
///
/// Even-length inputs average the two middle values. Returns `None` for an
/// empty slice. Non-finite values are ordered with `total_cmp`.
pub fn median(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sum of squared deviations from the slice's own mean.
#[inline]
pub fn sum_squared_error(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum()
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = sum_squared_error(values) / (values.len() - 1) as f64;
    variance.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[], None)]
    #[case(&[3.0], Some(3.0))]
    #[case(&[5.0, 1.0, 3.0], Some(3.0))]
    #[case(&[4.0, 1.0, 3.0, 2.0], Some(2.5))]
    fn median_cases(#[case] values: &[f64], #[case] expected: Option<f64>) {
        assert_eq!(median(values), expected);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_abs_diff_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        assert_eq!(sample_std(&[7.0]), 0.0);
        // deviations: -1, 1 -> ss = 2, / (2 - 1) = 2
        assert_abs_diff_eq!(sample_std(&[1.0, 3.0]), 2.0f64.sqrt(), epsilon = 1e-12);
    }
}
