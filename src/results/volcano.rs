//! Volcano-plot series: signed difference against `-log10(p)` per group pair.
//!
//! Plot rendering is left to the consumer; this module only extracts the two
//! parallel series from the summary table and marks the points above the
//! display cutoff.

use super::{SummaryTable, difference_column, neg_log10_p_column};
use crate::error::{Result, TTestError};
use crate::testing::GroupPair;

/// Points with `-log10(p)` above this value (p < 0.01) are highlighted.
pub const VOLCANO_CUTOFF: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct VolcanoSeries {
    pub label: String,
    pub feature_ids: Vec<String>,
    pub differences: Vec<f64>,
    pub neg_log10_p_values: Vec<f64>,
}

impl VolcanoSeries {
    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn is_highlighted(&self, index: usize, cutoff: f64) -> bool {
        self.neg_log10_p_values[index] > cutoff
    }

    /// Indices of the points above `cutoff`.
    pub fn highlighted(&self, cutoff: f64) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.is_highlighted(i, cutoff))
            .collect()
    }
}

pub struct VolcanoDataBuilder;

impl VolcanoDataBuilder {
    /// One series per pair, read from the summary's `diff_of_*` and
    /// `neg_log10_p_value_*` columns.
    pub fn build(summary: &SummaryTable, pairs: &[GroupPair]) -> Result<Vec<VolcanoSeries>> {
        pairs
            .iter()
            .map(|pair| {
                let label = pair.label();
                let diff_name = difference_column(&label);
                let lp_name = neg_log10_p_column(&label);
                let differences = summary.column(&diff_name).ok_or_else(|| TTestError::Schema {
                    table: "summary table",
                    column: diff_name.clone(),
                })?;
                let neg_log10_p_values = summary.column(&lp_name).ok_or_else(|| TTestError::Schema {
                    table: "summary table",
                    column: lp_name.clone(),
                })?;
                Ok(VolcanoSeries {
                    label,
                    feature_ids: summary.feature_ids.clone(),
                    differences: differences.to_vec(),
                    neg_log10_p_values: neg_log10_p_values.to_vec(),
                })
            })
            .collect()
    }
}
