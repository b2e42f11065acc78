//! Parametric t-tests for feature tables.
//!
//! Two-sided Student's t-test for independent groups (pooled variance) and
//! the related-samples t-test on matched pairs. Degenerate inputs (zero
//! standard error, no degrees of freedom) produce an undefined result rather
//! than an error, so one bad feature never stops a batch.

use crate::testing::utils::{mean, sum_of_squares};
use crate::testing::{TTestType, TestResult};
use ndarray::Array2;
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Perform t-tests on every feature (row) of `matrix` comparing two column sets.
///
/// For [`TTestType::Paired`] the two column sets are matched position by
/// position and must have the same length.
///
/// # Returns
///
/// One `TestResult` per row, in row order.
pub fn t_test_matrix_groups(
    matrix: &Array2<f64>,
    group1_columns: &[usize],
    group2_columns: &[usize],
    test_type: TTestType,
) -> anyhow::Result<Vec<TestResult<f64>>> {
    if group1_columns.is_empty() || group2_columns.is_empty() {
        return Err(anyhow::anyhow!("Group indices cannot be empty"));
    }
    if test_type == TTestType::Paired && group1_columns.len() != group2_columns.len() {
        return Err(anyhow::anyhow!(
            "Paired t-test needs matched groups, got {} and {} samples",
            group1_columns.len(),
            group2_columns.len()
        ));
    }

    let results = (0..matrix.nrows())
        .into_par_iter()
        .map(|row| {
            let values = matrix.row(row);
            let x: Vec<f64> = group1_columns.iter().map(|&c| values[c]).collect();
            let y: Vec<f64> = group2_columns.iter().map(|&c| values[c]).collect();
            match test_type {
                TTestType::Student => t_test(&x, &y),
                TTestType::Paired => paired_t_test(&x, &y),
            }
        })
        .collect();

    Ok(results)
}

/// Student's two-sample t-test with pooled variance.
///
/// A single observation per group is allowed as long as the pooled degrees of
/// freedom `nx + ny - 2` stay positive.
pub fn t_test(x: &[f64], y: &[f64]) -> TestResult<f64> {
    let nx = x.len() as f64;
    let ny = y.len() as f64;
    let df = nx + ny - 2.0;

    if x.is_empty() || y.is_empty() || df <= 0.0 {
        return TestResult::undefined();
    }

    let pooled_var = (sum_of_squares(x) + sum_of_squares(y)) / df;
    let std_err = (pooled_var * (1.0 / nx + 1.0 / ny)).sqrt();

    t_test_from_moments(mean(x) - mean(y), std_err, df)
}

/// Related-samples t-test: a one-sample test of `x[i] - y[i]` against zero.
pub fn paired_t_test(x: &[f64], y: &[f64]) -> TestResult<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return TestResult::undefined();
    }

    let diffs: Vec<f64> = x.iter().zip(y.iter()).map(|(&a, &b)| a - b).collect();
    let n = diffs.len() as f64;
    let df = n - 1.0;
    let std_err = (sum_of_squares(&diffs) / df / n).sqrt();

    t_test_from_moments(mean(&diffs), std_err, df)
}

/// Build a two-sided test result from a mean difference, its standard error
/// and degrees of freedom.
pub fn t_test_from_moments(mean_diff: f64, std_err: f64, df: f64) -> TestResult<f64> {
    if !(std_err > 0.0) || !std_err.is_finite() || !mean_diff.is_finite() {
        return TestResult::undefined().with_degrees_of_freedom(df);
    }

    let t_stat = mean_diff / std_err;
    TestResult::new(t_stat, two_sided_p_value(t_stat, df))
        .with_degrees_of_freedom(df)
        .with_standard_error(std_err)
}

/// Two-sided p-value of `t_stat` under Student's t with `df` degrees of freedom.
pub fn two_sided_p_value(t_stat: f64, df: f64) -> f64 {
    if t_stat.is_nan() || !(df > 0.0) {
        return f64::NAN;
    }
    if t_stat.is_infinite() {
        return 0.0;
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * t_dist.sf(t_stat.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}
