use num_traits::Float;
use std::fmt;

pub mod engine;
pub mod inference;

pub mod utils;

pub use engine::{DescriptiveStats, PairwiseTestEngine};

/// p-value thresholds of the three significance flags, smallest first.
pub const FLAG_THRESHOLDS: [f64; 3] = [0.01, 0.05, 0.10];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTestType {
    Student, // Independent samples, pooled variance
    Paired,  // Related samples, test on the differences
}

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The t-statistic
    pub statistic: T,
    /// Two-sided p-value
    pub p_value: T,
    /// Degrees of freedom
    pub degrees_of_freedom: Option<T>,
    /// Standard error of the mean difference
    pub standard_error: Option<T>,
}

impl<T> TestResult<T>
where
    T: Float,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
            standard_error: None,
        }
    }

    /// Result of a test that cannot be computed (zero standard error, no degrees of freedom).
    pub fn undefined() -> Self {
        TestResult::new(T::nan(), T::nan())
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: T) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: T) -> Self {
        self.standard_error = Some(se);
        self
    }

    pub fn is_defined(&self) -> bool {
        !self.statistic.is_nan() && !self.p_value.is_nan()
    }

    /// Check if the result is statistically significant at the given threshold.
    /// Always false for an undefined result.
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}

/// Threshold flags of one test. The thresholds are nested: a p-value below
/// 0.01 sets all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignificanceFlags {
    pub p0p01: bool,
    pub p0p05: bool,
    pub p0p10: bool,
}

impl SignificanceFlags {
    /// Compare the unrounded p-value against each threshold. NaN sets nothing.
    pub fn from_p_value(p_value: f64) -> Self {
        SignificanceFlags {
            p0p01: p_value < FLAG_THRESHOLDS[0],
            p0p05: p_value < FLAG_THRESHOLDS[1],
            p0p10: p_value < FLAG_THRESHOLDS[2],
        }
    }

    pub fn as_array(&self) -> [bool; 3] {
        [self.p0p01, self.p0p05, self.p0p10]
    }
}

/// An ordered pair of group labels; `first` is the minuend of the difference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPair {
    pub first: String,
    pub second: String,
}

impl GroupPair {
    pub fn new(first: &str, second: &str) -> Self {
        GroupPair {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Column suffix `<first>_<second>`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.first, self.second)
    }

    pub fn reversed(&self) -> Self {
        GroupPair {
            first: self.second.clone(),
            second: self.first.clone(),
        }
    }
}

impl fmt::Display for GroupPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.first, self.second)
    }
}

/// Test outcome for one feature within one group pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureTest {
    pub statistic: f64,
    pub p_value: f64,
    /// `-log10(p_value)`; infinite when the p-value underflows to 0.
    pub neg_log10_p_value: f64,
    /// mean(first) - mean(second)
    pub difference: f64,
    pub flags: SignificanceFlags,
}

impl FeatureTest {
    pub fn new(result: &TestResult<f64>, difference: f64) -> Self {
        FeatureTest {
            statistic: result.statistic,
            p_value: result.p_value,
            neg_log10_p_value: utils::neg_log10(result.p_value),
            difference,
            flags: SignificanceFlags::from_p_value(result.p_value),
        }
    }
}

/// All per-feature tests of one group pair, in feature-table row order.
#[derive(Debug, Clone)]
pub struct GroupPairResult {
    pub pair: GroupPair,
    pub test_type: TTestType,
    pub features: Vec<FeatureTest>,
}

impl GroupPairResult {
    pub fn label(&self) -> String {
        self.pair.label()
    }

    pub fn num_significant(&self, threshold_index: usize) -> usize {
        self.features
            .iter()
            .filter(|f| f.flags.as_array().get(threshold_index).copied().unwrap_or(false))
            .count()
    }
}
