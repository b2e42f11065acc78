//! Output tables.
//!
//! [`ResultAssembler`] merges the descriptive statistics and every
//! [`GroupPairResult`] into a [`SummaryTable`] of continuous values and a
//! [`FlagTable`] of significance indicators. Both are keyed by feature
//! identifier in feature-table order, and both are filled in one pass into
//! pre-sized matrices addressed by (row, column) index.

use crate::config::TestMode;
use crate::error::{Result, TTestError};
use crate::testing::{DescriptiveStats, GroupPairResult};
use ndarray::{Array2, ArrayView1};

pub mod volcano;
pub mod writer;

pub use volcano::{VOLCANO_CUTOFF, VolcanoDataBuilder, VolcanoSeries};

pub const GRAND_MEAN: &str = "GrandMean";
pub const SAMPLE_VARIANCE: &str = "SampleVariance";

/// Threshold tokens used in flag column names, matching `FLAG_THRESHOLDS`.
pub const THRESHOLD_TOKENS: [&str; 3] = ["0p01", "0p05", "0p10"];

/// Decimal digits kept when the summary is written out.
pub const SUMMARY_DIGITS: i32 = 4;

pub fn group_mean_column(group: &str) -> String {
    format!("mean_treatment_{}", group)
}

pub fn t_value_column(pair_label: &str) -> String {
    format!("t_value_for_diff_{}", pair_label)
}

pub fn p_value_column(pair_label: &str) -> String {
    format!("prob_greater_than_t_for_diff_{}", pair_label)
}

pub fn neg_log10_p_column(pair_label: &str) -> String {
    format!("neg_log10_p_value_{}", pair_label)
}

pub fn difference_column(pair_label: &str) -> String {
    format!("diff_of_{}", pair_label)
}

/// Flag column naming scheme, selected once from the test mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagNaming {
    /// `flag_significant_0p05_on_<A>_<B>`
    Unpaired,
    /// `flag_value_diff_signif_<A>_<B>_0p05`
    Paired,
}

impl FlagNaming {
    pub fn for_mode(mode: TestMode) -> Self {
        match mode {
            TestMode::Unpaired => FlagNaming::Unpaired,
            TestMode::Paired => FlagNaming::Paired,
        }
    }

    pub fn column(&self, pair_label: &str, threshold_index: usize) -> String {
        let token = THRESHOLD_TOKENS[threshold_index];
        match self {
            FlagNaming::Unpaired => format!("flag_significant_{}_on_{}", token, pair_label),
            FlagNaming::Paired => format!("flag_value_diff_signif_{}_{}", pair_label, token),
        }
    }

    pub fn columns(&self, pair_label: &str) -> [String; 3] {
        [0, 1, 2].map(|i| self.column(pair_label, i))
    }
}

/// Round half away from zero to `digits` decimals. Non-finite values pass through.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(digits);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= 1e15 {
        return value;
    }
    let rounded = scaled.round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Continuous per-feature results at full precision.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub index_name: String,
    pub feature_ids: Vec<String>,
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl SummaryTable {
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values.column(i))
    }

    pub fn get(&self, feature: &str, column: &str) -> Option<f64> {
        let row = self.feature_ids.iter().position(|f| f == feature)?;
        self.column(column).map(|c| c[row])
    }

    /// Copy with every value rounded for display.
    pub fn rounded(&self, digits: i32) -> SummaryTable {
        SummaryTable {
            index_name: self.index_name.clone(),
            feature_ids: self.feature_ids.clone(),
            columns: self.columns.clone(),
            values: self.values.mapv(|v| round_to(v, digits)),
        }
    }
}

/// Boolean significance indicators per feature.
#[derive(Debug, Clone)]
pub struct FlagTable {
    pub index_name: String,
    pub feature_ids: Vec<String>,
    pub columns: Vec<String>,
    pub values: Array2<bool>,
}

impl FlagTable {
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, bool>> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values.column(i))
    }

    pub fn get(&self, feature: &str, column: &str) -> Option<bool> {
        let row = self.feature_ids.iter().position(|f| f == feature)?;
        self.column(column).map(|c| c[row])
    }
}

/// Builds the summary and flag tables.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    naming: FlagNaming,
    index_name: String,
}

impl ResultAssembler {
    pub fn new(mode: TestMode, index_name: &str) -> Self {
        ResultAssembler {
            naming: FlagNaming::for_mode(mode),
            index_name: index_name.to_string(),
        }
    }

    pub fn assemble(
        &self,
        feature_ids: &[String],
        stats: &DescriptiveStats,
        results: &[GroupPairResult],
    ) -> Result<(SummaryTable, FlagTable)> {
        let n_rows = feature_ids.len();

        let mut summary_columns: Vec<(String, Vec<f64>)> = Vec::new();
        summary_columns.push((GRAND_MEAN.to_string(), stats.grand_mean.clone()));
        summary_columns.push((SAMPLE_VARIANCE.to_string(), stats.sample_variance.clone()));
        for (group, means) in &stats.group_means {
            summary_columns.push((group_mean_column(group), means.clone()));
        }

        let mut flag_columns: Vec<(String, Vec<bool>)> = Vec::new();
        for result in results {
            let label = result.label();
            let f = &result.features;
            summary_columns.push((t_value_column(&label), f.iter().map(|t| t.statistic).collect()));
            summary_columns.push((p_value_column(&label), f.iter().map(|t| t.p_value).collect()));
            summary_columns.push((
                neg_log10_p_column(&label),
                f.iter().map(|t| t.neg_log10_p_value).collect(),
            ));
            summary_columns.push((difference_column(&label), f.iter().map(|t| t.difference).collect()));

            for (i, name) in self.naming.columns(&label).into_iter().enumerate() {
                flag_columns.push((name, f.iter().map(|t| t.flags.as_array()[i]).collect()));
            }
        }

        let summary = SummaryTable {
            index_name: self.index_name.clone(),
            feature_ids: feature_ids.to_vec(),
            columns: summary_columns.iter().map(|(name, _)| name.clone()).collect(),
            values: fill(n_rows, &summary_columns, f64::NAN)?,
        };
        let flags = FlagTable {
            index_name: self.index_name.clone(),
            feature_ids: feature_ids.to_vec(),
            columns: flag_columns.iter().map(|(name, _)| name.clone()).collect(),
            values: fill(n_rows, &flag_columns, false)?,
        };

        Ok((summary, flags))
    }
}

fn fill<T: Copy>(n_rows: usize, columns: &[(String, Vec<T>)], init: T) -> Result<Array2<T>> {
    let mut values = Array2::from_elem((n_rows, columns.len()), init);
    for (j, (name, column)) in columns.iter().enumerate() {
        if column.len() != n_rows {
            return Err(TTestError::ResultShape {
                column: name.clone(),
                found: column.len(),
                expected: n_rows,
            });
        }
        for (i, &v) in column.iter().enumerate() {
            values[[i, j]] = v;
        }
    }
    Ok(values)
}
