//! Input tables consumed by the t-test engine.
//!
//! The engine only ever sees a [`TabularDataset`]: a numeric feature-by-sample
//! matrix plus a sample-by-metadata design table, already aligned by sample
//! identifier. [`WideDesignDataset`] is the in-memory implementation, and
//! [`wide::load_wide_design`] builds one from the tab-delimited wide and design
//! files.

use crate::error::{Result, TTestError};
use log::warn;
use ndarray::{Array2, ArrayView1};
use std::collections::{HashMap, HashSet};

pub mod wide;

pub use wide::load_wide_design;

/// Source of the two aligned input tables.
pub trait TabularDataset {
    fn features(&self) -> &FeatureTable;
    fn design(&self) -> &DesignTable;
}

/// Numeric matrix with features as rows and samples as columns.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    feature_ids: Vec<String>,
    sample_ids: Vec<String>,
    sample_index: HashMap<String, usize>,
    values: Array2<f64>,
}

impl FeatureTable {
    /// Build a table from a `features x samples` matrix.
    pub fn new(feature_ids: Vec<String>, sample_ids: Vec<String>, values: Array2<f64>) -> Result<Self> {
        let (n_rows, n_cols) = values.dim();
        if n_cols != sample_ids.len() {
            return Err(TTestError::RaggedRow {
                feature: feature_ids.first().cloned().unwrap_or_default(),
                found: n_cols,
                expected: sample_ids.len(),
            });
        }
        if n_rows != feature_ids.len() {
            return Err(TTestError::RaggedRow {
                feature: "<matrix rows>".to_string(),
                found: n_rows,
                expected: feature_ids.len(),
            });
        }

        let mut seen = HashSet::with_capacity(feature_ids.len());
        for id in &feature_ids {
            if !seen.insert(id.as_str()) {
                return Err(TTestError::DuplicateFeature(id.clone()));
            }
        }

        let mut sample_index = HashMap::with_capacity(sample_ids.len());
        for (i, id) in sample_ids.iter().enumerate() {
            if sample_index.insert(id.clone(), i).is_some() {
                return Err(TTestError::DuplicateSample(id.clone()));
            }
        }

        Ok(FeatureTable {
            feature_ids,
            sample_ids,
            sample_index,
            values,
        })
    }

    /// Build a table from one `Vec` of values per feature.
    pub fn from_rows(
        feature_ids: Vec<String>,
        sample_ids: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let n_samples = sample_ids.len();
        if rows.len() != feature_ids.len() {
            return Err(TTestError::RaggedRow {
                feature: "<matrix rows>".to_string(),
                found: rows.len(),
                expected: feature_ids.len(),
            });
        }
        let mut flat = Vec::with_capacity(rows.len() * n_samples);
        for (feature, row) in feature_ids.iter().zip(rows.iter()) {
            if row.len() != n_samples {
                return Err(TTestError::RaggedRow {
                    feature: feature.clone(),
                    found: row.len(),
                    expected: n_samples,
                });
            }
            flat.extend_from_slice(row);
        }
        let values = Array2::from_shape_vec((rows.len(), n_samples), flat).map_err(|_| {
            TTestError::RaggedRow {
                feature: "<matrix rows>".to_string(),
                found: rows.len(),
                expected: feature_ids.len(),
            }
        })?;
        Self::new(feature_ids, sample_ids, values)
    }

    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn n_features(&self) -> usize {
        self.feature_ids.len()
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self, feature: usize) -> ArrayView1<'_, f64> {
        self.values.row(feature)
    }

    pub fn column_index(&self, sample: &str) -> Option<usize> {
        self.sample_index.get(sample).copied()
    }

    /// Resolve sample identifiers to column indices, failing on the first unknown one.
    pub fn column_indices<S: AsRef<str>>(&self, samples: &[S]) -> Result<Vec<usize>> {
        samples
            .iter()
            .map(|s| {
                self.column_index(s.as_ref())
                    .ok_or_else(|| TTestError::UnknownSample(s.as_ref().to_string()))
            })
            .collect()
    }

    /// Values of one feature at the given columns, in the order given.
    pub fn gather(&self, feature: usize, columns: &[usize]) -> Vec<f64> {
        let row = self.values.row(feature);
        columns.iter().map(|&c| row[c]).collect()
    }

    /// Copy of the table restricted to `samples`, keeping this table's column order.
    pub fn select_samples(&self, samples: &HashSet<&str>) -> Result<Self> {
        let keep: Vec<usize> = (0..self.sample_ids.len())
            .filter(|&i| samples.contains(self.sample_ids[i].as_str()))
            .collect();
        let sample_ids = keep.iter().map(|&i| self.sample_ids[i].clone()).collect();
        let values = self.values.select(ndarray::Axis(1), &keep);
        Self::new(self.feature_ids.clone(), sample_ids, values)
    }

    /// Copy of the table restricted to the features at `rows`.
    pub fn select_features(&self, rows: &[usize]) -> Result<Self> {
        let feature_ids = rows.iter().map(|&i| self.feature_ids[i].clone()).collect();
        let values = self.values.select(ndarray::Axis(0), rows);
        Self::new(feature_ids, self.sample_ids.clone(), values)
    }
}

/// Per-sample metadata; one row per sample identifier.
#[derive(Debug, Clone)]
pub struct DesignTable {
    sample_ids: Vec<String>,
    columns: Vec<String>,
    records: Vec<Vec<String>>,
    sample_index: HashMap<String, usize>,
}

impl DesignTable {
    /// Name of the sample identifier column in design files.
    pub const SAMPLE_ID: &'static str = "sampleID";

    /// `columns` names the metadata fields; each row is `(sample id, values)`.
    pub fn new(columns: Vec<String>, rows: Vec<(String, Vec<String>)>) -> Result<Self> {
        let mut sample_ids = Vec::with_capacity(rows.len());
        let mut records = Vec::with_capacity(rows.len());
        let mut sample_index = HashMap::with_capacity(rows.len());

        for (sample, values) in rows {
            if values.len() != columns.len() {
                return Err(TTestError::RaggedRow {
                    feature: sample,
                    found: values.len(),
                    expected: columns.len(),
                });
            }
            if sample_index.insert(sample.clone(), sample_ids.len()).is_some() {
                return Err(TTestError::DuplicateSample(sample));
            }
            sample_ids.push(sample);
            records.push(values);
        }

        Ok(DesignTable {
            sample_ids,
            columns,
            records,
            sample_index,
        })
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn len(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_ids.is_empty()
    }

    fn column_position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TTestError::Schema {
                table: "design table",
                column: name.to_string(),
            })
    }

    /// All values of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let pos = self.column_position(name)?;
        Ok(self.records.iter().map(|r| r[pos].as_str()).collect())
    }

    pub fn value(&self, sample: &str, column: &str) -> Result<Option<&str>> {
        let pos = self.column_position(column)?;
        Ok(self
            .sample_index
            .get(sample)
            .map(|&row| self.records[row][pos].as_str()))
    }

    pub fn contains_sample(&self, sample: &str) -> bool {
        self.sample_index.contains_key(sample)
    }

    /// Independent copy holding only the samples in `keep`, in the original row order.
    pub fn retain_samples(&self, keep: &HashSet<&str>) -> DesignTable {
        let mut sample_ids = Vec::new();
        let mut records = Vec::new();
        let mut sample_index = HashMap::new();
        for (sample, record) in self.sample_ids.iter().zip(self.records.iter()) {
            if keep.contains(sample.as_str()) {
                sample_index.insert(sample.clone(), sample_ids.len());
                sample_ids.push(sample.clone());
                records.push(record.clone());
            }
        }
        DesignTable {
            sample_ids,
            columns: self.columns.clone(),
            records,
            sample_index,
        }
    }
}

/// A feature table and its design, aligned by sample identifier.
#[derive(Debug, Clone)]
pub struct WideDesignDataset {
    features: FeatureTable,
    design: DesignTable,
}

impl WideDesignDataset {
    /// Pair a feature table with its design.
    ///
    /// Every feature-table sample needs a design row. Design rows without a
    /// matching feature column are dropped.
    pub fn new(features: FeatureTable, design: DesignTable) -> Result<Self> {
        for sample in features.sample_ids() {
            if !design.contains_sample(sample) {
                return Err(TTestError::UnknownSample(sample.clone()));
            }
        }

        let design = if design.len() != features.n_samples() {
            let keep: HashSet<&str> = features.sample_ids().iter().map(String::as_str).collect();
            let extra: Vec<&String> = design
                .sample_ids()
                .iter()
                .filter(|s| !keep.contains(s.as_str()))
                .collect();
            warn!(
                "{} design sample(s) have no column in the wide table and are ignored: {:?}",
                extra.len(),
                extra
            );
            design.retain_samples(&keep)
        } else {
            design
        };

        Ok(WideDesignDataset { features, design })
    }
}

impl TabularDataset for WideDesignDataset {
    fn features(&self) -> &FeatureTable {
        &self.features
    }

    fn design(&self) -> &DesignTable {
        &self.design
    }
}
