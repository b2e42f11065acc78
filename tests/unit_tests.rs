use pairwise_ttest::testing::inference::parametric::{paired_t_test, t_test, t_test_matrix_groups};
use pairwise_ttest::testing::inference::MatrixStatTests;
use pairwise_ttest::testing::{SignificanceFlags, TTestType, TestResult};
use approx::assert_relative_eq;
use ndarray::Array2;

#[cfg(test)]
mod quick_test {
    use super::*;

    #[test]
    fn check_if_ttest_works() {
        // Group 1: [1, 2, 3] -> mean=2
        // Group 2: [7, 8, 9] -> mean=8
        // Clearly different, so p-value should be very small (< 0.05)
        let result: TestResult<f64> = t_test(&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0]);

        println!("=== T-TEST RESULTS ===");
        println!("T-statistic: {}", result.statistic);
        println!("P-value: {}", result.p_value);

        assert!(result.p_value < 0.05);
        assert!(result.statistic < -2.0);
        assert_relative_eq!(result.standard_error.unwrap(), (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn check_identical_groups() {
        // Identical but non-constant groups: t = 0, p = 1
        let result = t_test(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(result.statistic, 0.0);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
        assert_eq!(SignificanceFlags::from_p_value(result.p_value), SignificanceFlags::default());
    }

    #[test]
    fn check_identical_pairs() {
        // Paired series with identical values: every difference is zero
        let result = paired_t_test(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
        assert_eq!(SignificanceFlags::from_p_value(result.p_value).p0p10, false);
    }

    #[test]
    fn test_paired_is_more_sensitive_to_consistent_shifts() {
        // Large between-subject spread, small consistent within-pair shift
        let before = [10.0, 20.0, 30.0, 40.0, 50.0];
        let after = [10.5, 20.4, 30.6, 40.5, 50.5];

        let unpaired = t_test(&before, &after);
        let paired = paired_t_test(&before, &after);

        println!("\n=== PAIRED VS UNPAIRED ===");
        println!("Unpaired: t={:.3}, p={:.6}", unpaired.statistic, unpaired.p_value);
        println!("Paired:   t={:.3}, p={:.6}", paired.statistic, paired.p_value);

        assert!(unpaired.p_value > 0.5, "Unpaired test should not detect the shift");
        assert!(paired.p_value < 0.001, "Paired test should detect the shift");
        assert_eq!(paired.degrees_of_freedom, Some(4.0));
    }

    #[test]
    fn test_unequal_sample_sizes() {
        let large = [5.0, 4.5, 5.5, 5.2, 4.8, 5.1, 4.9, 5.0, 5.3, 4.7];
        let small = [7.0, 7.2, 6.9];

        let result = t_test(&small, &large);
        println!("\n=== UNEQUAL SAMPLE SIZES TEST ===");
        println!("T-statistic: {}", result.statistic);
        println!("P-value: {}", result.p_value);

        assert!(result.p_value < 0.01);
        assert!(result.statistic > 0.0);
        assert_eq!(result.degrees_of_freedom, Some(11.0));
    }

    #[test]
    fn test_high_variance_groups() {
        // Same means, high variance: no difference expected
        let result = t_test(&[1.0, 10.0, 2.0, 9.0, 3.0], &[2.0, 8.0, 4.0, 7.0, 4.0]);
        assert!(result.p_value > 0.1, "Should not detect difference with same means");
        assert!(result.statistic.abs() < 1.0, "T-statistic should be small");
    }

    #[test]
    fn test_minimal_sample_size() {
        // n=2 per group
        let result = t_test(&[5.0, 7.0], &[3.0, 5.0]);
        assert!(result.p_value.is_finite(), "P-value should be finite");
        assert!(result.statistic.is_finite(), "T-statistic should be finite");
        assert_eq!(result.degrees_of_freedom, Some(2.0));
    }

    #[test]
    fn test_perfect_separation_is_undefined() {
        // [1,1,1] vs [5,5,5]: zero standard error, reported as not-a-number
        let result = t_test(&[1.0, 1.0, 1.0], &[5.0, 5.0, 5.0]);
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
        assert!(!result.is_significant(0.1));
    }

    #[test]
    fn test_matrix_based_workflow() {
        // 3 features x 8 samples; samples 0..4 are group 1, 4..8 are group 2
        let matrix = Array2::from_shape_vec(
            (3, 8),
            vec![
                1.0, 1.2, 0.8, 1.1, 5.0, 5.3, 4.9, 5.1, // clear difference
                3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, // constant
                0.0, 0.5, 1.0, 0.5, 2.0, 3.0, 2.5, 3.5, // moderate difference
            ],
        )
        .unwrap();

        let group1 = vec![0, 1, 2, 3];
        let group2 = vec![4, 5, 6, 7];

        let results = t_test_matrix_groups(&matrix, &group1, &group2, TTestType::Student)
            .expect("Matrix t-test should work");
        let via_trait = matrix.t_test(&group1, &group2, TTestType::Student).unwrap();

        for (idx, result) in results.iter().enumerate() {
            println!("Feature {}: t={:.3}, p={:.6}", idx, result.statistic, result.p_value);
        }

        assert!(results[0].p_value < 0.001);
        assert!(!results[1].is_defined());
        assert!(results[2].p_value < 0.01);
        assert_relative_eq!(results[2].statistic, via_trait[2].statistic);

        let paired = matrix.t_test(&group1, &group2, TTestType::Paired).unwrap();
        assert_eq!(paired.len(), 3);
        assert!(paired[0].statistic < 0.0);
    }
}
