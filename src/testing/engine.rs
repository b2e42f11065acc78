//! Runs the per-feature tests for every group pair.
//!
//! Each group pair yields one self-contained [`GroupPairResult`]; nothing is
//! accumulated across pairs. Rows are computed in parallel and collected in
//! feature order.

use crate::data::FeatureTable;
use crate::design::{GroupPartition, ValidatedPairing};
use crate::error::{Result, TTestError};
use crate::testing::inference::MatrixStatTests;
use crate::testing::utils::{group_pairs, mean, sample_variance};
use crate::testing::{FeatureTest, GroupPair, GroupPairResult, TTestType, TestResult};
use log::{debug, info, warn};
use rayon::prelude::*;

/// Test-independent summaries of every feature.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// Mean over all retained samples.
    pub grand_mean: Vec<f64>,
    /// Sample variance (divisor n - 1) over all retained samples.
    pub sample_variance: Vec<f64>,
    /// Per-group means, in partition label order.
    pub group_means: Vec<(String, Vec<f64>)>,
}

/// Whether a group pair has enough samples for its test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairReadiness {
    Testable,
    /// Both sides have samples but the test has no degrees of freedom.
    Undersized,
}

impl PairReadiness {
    pub fn assess(n_first: usize, n_second: usize, test_type: TTestType) -> Self {
        let testable = match test_type {
            TTestType::Student => n_first + n_second > 2,
            TTestType::Paired => n_first == n_second && n_first >= 2,
        };
        if testable {
            PairReadiness::Testable
        } else {
            PairReadiness::Undersized
        }
    }
}

pub struct PairwiseTestEngine<'a> {
    table: &'a FeatureTable,
}

impl<'a> PairwiseTestEngine<'a> {
    pub fn new(table: &'a FeatureTable) -> Self {
        PairwiseTestEngine { table }
    }

    /// Grand mean, sample variance and per-group means of every feature.
    pub fn describe(&self, partition: &GroupPartition) -> Result<DescriptiveStats> {
        let all: Vec<&String> = partition.iter().flat_map(|(_, samples)| samples.iter()).collect();
        let all_columns = self.table.column_indices(&all)?;

        let (grand_mean, sample_variance): (Vec<f64>, Vec<f64>) = (0..self.table.n_features())
            .into_par_iter()
            .map(|row| {
                let values = self.table.gather(row, &all_columns);
                (mean(&values), sample_variance(&values))
            })
            .unzip();

        let mut group_means = Vec::with_capacity(partition.n_groups());
        for (label, samples) in partition.iter() {
            let columns = self.table.column_indices(samples)?;
            group_means.push((label.to_string(), self.row_means(&columns)));
        }

        Ok(DescriptiveStats {
            grand_mean,
            sample_variance,
            group_means,
        })
    }

    /// Independent two-sample tests for every 2-combination of groups.
    pub fn run_unpaired(&self, partition: &GroupPartition) -> Result<Vec<GroupPairResult>> {
        let labels: Vec<&str> = partition.labels().collect();
        let pairs = group_pairs(&labels);
        info!(
            "Unpaired t-test will be performed for all {} group(s) pairwise ({} pair(s))",
            labels.len(),
            pairs.len()
        );

        // any empty side aborts the run before a single test is computed
        let mut columns = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let first = self.group_columns(partition, pair, &pair.first)?;
            let second = self.group_columns(partition, pair, &pair.second)?;
            columns.push((first, second));
        }

        pairs
            .into_iter()
            .zip(columns)
            .map(|(pair, (first, second))| self.compare(pair, &first, &second, TTestType::Student))
            .collect()
    }

    /// Related-samples test over the validated pairs.
    ///
    /// Sample `i` of the first group is matched with sample `i` of the second
    /// through the pairing unit, in ascending pairing-identifier order.
    pub fn run_paired(&self, pairing: &ValidatedPairing) -> Result<Vec<GroupPairResult>> {
        if pairing.units.is_empty() {
            return Err(TTestError::NoPairedSamples);
        }
        let pair = GroupPair::new(&pairing.groups.0, &pairing.groups.1);
        info!(
            "Paired t-test will be performed for groups {} and {} over {} pair(s)",
            pair.first,
            pair.second,
            pairing.units.len()
        );

        let firsts: Vec<&str> = pairing.units.iter().map(|u| u.first.as_str()).collect();
        let seconds: Vec<&str> = pairing.units.iter().map(|u| u.second.as_str()).collect();
        let first = self.table.column_indices(&firsts)?;
        let second = self.table.column_indices(&seconds)?;

        Ok(vec![self.compare(pair, &first, &second, TTestType::Paired)?])
    }

    fn group_columns(&self, partition: &GroupPartition, pair: &GroupPair, label: &str) -> Result<Vec<usize>> {
        let samples = partition.samples(label).unwrap_or_default();
        if samples.is_empty() {
            return Err(TTestError::EmptyGroup {
                group: label.to_string(),
                pair: pair.label(),
            });
        }
        self.table.column_indices(samples)
    }

    fn compare(
        &self,
        pair: GroupPair,
        first: &[usize],
        second: &[usize],
        test_type: TTestType,
    ) -> Result<GroupPairResult> {
        let first_means = self.row_means(first);
        let second_means = self.row_means(second);

        let tests = match PairReadiness::assess(first.len(), second.len(), test_type) {
            PairReadiness::Testable => self.table.values().t_test(first, second, test_type)?,
            PairReadiness::Undersized => {
                warn!(
                    "Group pair {} has too few samples ({} vs {}) for a t-test; its results are undefined",
                    pair,
                    first.len(),
                    second.len()
                );
                vec![TestResult::undefined(); self.table.n_features()]
            }
        };

        let features: Vec<FeatureTest> = tests
            .iter()
            .zip(first_means.iter().zip(second_means.iter()))
            .map(|(result, (a, b))| FeatureTest::new(result, a - b))
            .collect();

        let result = GroupPairResult {
            pair,
            test_type,
            features,
        };
        debug!(
            "{}: {} feature(s) below 0.05",
            result.label(),
            result.num_significant(1)
        );
        Ok(result)
    }

    fn row_means(&self, columns: &[usize]) -> Vec<f64> {
        (0..self.table.n_features())
            .into_par_iter()
            .map(|row| mean(&self.table.gather(row, columns)))
            .collect()
    }
}
