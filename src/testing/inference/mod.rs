use crate::testing::{TTestType, TestResult};
use ndarray::Array2;

pub mod parametric;

/// Row-wise hypothesis tests over a `features x samples` matrix.
pub trait MatrixStatTests {
    /// Test every row, comparing the values at `group1_columns` with those at
    /// `group2_columns`. Paired tests match the two column lists position by
    /// position.
    fn t_test(
        &self,
        group1_columns: &[usize],
        group2_columns: &[usize],
        test_type: TTestType,
    ) -> anyhow::Result<Vec<TestResult<f64>>>;
}

impl MatrixStatTests for Array2<f64> {
    fn t_test(
        &self,
        group1_columns: &[usize],
        group2_columns: &[usize],
        test_type: TTestType,
    ) -> anyhow::Result<Vec<TestResult<f64>>> {
        parametric::t_test_matrix_groups(self, group1_columns, group2_columns, test_type)
    }
}
