//! Vector math primitives shared by the metrics.
//!
//! All functions are total: mismatched lengths, empty input and zero
//! magnitudes produce 0 rather than an error.

/// Dot product of two vectors. Mismatched lengths yield 0.
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum()
}

/// Euclidean magnitude of a vector.
pub fn magnitude(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt()
}

/// Cosine similarity in [-1, 1].
///
/// Returns 0 for empty vectors, mismatched lengths or zero-magnitude input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let norm_a = magnitude(a);
    let norm_b = magnitude(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Arithmetic mean of a slice of values; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Component-wise mean of equally sized vectors.
///
/// Vectors whose length differs from the first one are skipped.
/// Returns an empty vector for empty input.
pub fn centroid<'a, I>(vectors: I) -> Vec<f32>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut iter = vectors.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut sum: Vec<f64> = first.iter().map(|x| f64::from(*x)).collect();
    let mut count = 1usize;
    for v in iter {
        if v.len() != sum.len() {
            continue;
        }
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += f64::from(*x);
        }
        count += 1;
    }

    sum.into_iter().map(|x| (x / count as f64) as f32).collect()
}

/// Clamp a value into [0, 1]. NaN maps to 0.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_magnitude() {
        assert!((magnitude(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(magnitude(&[]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs_return_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_scaled_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[0.2, 0.4, 0.6]) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_skips_mismatched_lengths() {
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        let c = [5.0f32, 5.0, 5.0];
        let center = centroid([&a[..], &b[..], &c[..]]);
        assert_eq!(center, vec![0.5, 0.5]);
        assert!(centroid(std::iter::empty::<&[f32]>()).is_empty());
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Cosine similarity always stays within [-1, 1] and is symmetric.
        #[test]
        fn prop_cosine_bounded_and_symmetric(
            pairs in prop::collection::vec((-10.0f32..10.0, -10.0f32..10.0), 1..32)
        ) {
            let a: Vec<f32> = pairs.iter().map(|(x, _)| *x).collect();
            let b: Vec<f32> = pairs.iter().map(|(_, y)| *y).collect();
            let ab = cosine_similarity(&a, &b);
            let ba = cosine_similarity(&b, &a);
            prop_assert!((-1.0..=1.0).contains(&ab));
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        /// clamp01 output is always inside the unit interval.
        #[test]
        fn prop_clamp01_in_unit_interval(x in any::<f64>()) {
            let c = clamp01(x);
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
