//! Tab-delimited wide and design file loader.
//!
//! The wide file has the feature identifier column plus one column per sample;
//! the design file has a `sampleID` column plus the metadata columns. Samples
//! present in only one of the two files are dropped, and features with a
//! missing value are removed before anything is tested.

use super::{DesignTable, FeatureTable, WideDesignDataset};
use crate::error::{Result, TTestError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;

/// Load and align a wide feature file with its design file.
pub fn load_wide_design<P: AsRef<Path>, Q: AsRef<Path>>(
    wide_path: P,
    design_path: Q,
    unique_id: &str,
) -> Result<WideDesignDataset> {
    info!(
        "Loading files {} and {}...",
        wide_path.as_ref().display(),
        design_path.as_ref().display()
    );
    let features = read_wide(wide_path.as_ref(), unique_id)?;
    let design = read_design(design_path.as_ref())?;
    align(features, design)
}

fn tsv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)?)
}

/// Parse one wide-table cell. Blank and NA-like cells become NaN.
pub(crate) fn parse_cell(raw: &str) -> f64 {
    let cell = raw.trim();
    match cell {
        "" | "NA" | "na" | "NaN" | "nan" | "null" | "None" => f64::NAN,
        _ => cell.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn read_wide(path: &Path, unique_id: &str) -> Result<FeatureTable> {
    let mut reader = tsv_reader(path)?;
    let headers = reader.headers()?.clone();

    let id_pos = headers
        .iter()
        .position(|h| h == unique_id)
        .ok_or_else(|| TTestError::Schema {
            table: "wide table",
            column: unique_id.to_string(),
        })?;
    let sample_ids: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_pos)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut feature_ids = Vec::new();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let feature = record.get(id_pos).unwrap_or_default().to_string();
        if record.len() != headers.len() {
            return Err(TTestError::RaggedRow {
                feature,
                found: record.len().saturating_sub(1),
                expected: sample_ids.len(),
            });
        }
        let values: Vec<f64> = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_pos)
            .map(|(_, v)| parse_cell(v))
            .collect();
        feature_ids.push(feature);
        rows.push(values);
    }

    debug!(
        "Wide table: {} features x {} samples",
        feature_ids.len(),
        sample_ids.len()
    );
    FeatureTable::from_rows(feature_ids, sample_ids, rows)
}

fn read_design(path: &Path) -> Result<DesignTable> {
    let mut reader = tsv_reader(path)?;
    let headers = reader.headers()?.clone();

    let id_pos = headers
        .iter()
        .position(|h| h == DesignTable::SAMPLE_ID)
        .ok_or_else(|| TTestError::Schema {
            table: "design table",
            column: DesignTable::SAMPLE_ID.to_string(),
        })?;
    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_pos)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let sample = record.get(id_pos).unwrap_or_default().trim().to_string();
        if sample.is_empty() {
            continue;
        }
        let values: Vec<String> = (0..headers.len())
            .filter(|&i| i != id_pos)
            .map(|i| record.get(i).unwrap_or_default().trim().to_string())
            .collect();
        rows.push((sample, values));
    }

    DesignTable::new(columns, rows)
}

fn align(features: FeatureTable, design: DesignTable) -> Result<WideDesignDataset> {
    let in_design: HashSet<&str> = design.sample_ids().iter().map(String::as_str).collect();
    let in_wide: HashSet<&str> = features.sample_ids().iter().map(String::as_str).collect();

    // elements borrow only from `design`; `features` is moved below
    let shared: HashSet<&str> = design
        .sample_ids()
        .iter()
        .map(String::as_str)
        .filter(|s| in_wide.contains(*s))
        .collect();
    if shared.is_empty() {
        return Err(TTestError::NoSharedSamples);
    }

    let wide_only: Vec<&String> = features
        .sample_ids()
        .iter()
        .filter(|s| !in_design.contains(s.as_str()))
        .collect();
    if !wide_only.is_empty() {
        warn!(
            "{} sample(s) in the wide table are missing from the design and will be removed: {:?}",
            wide_only.len(),
            wide_only
        );
    }

    let features = if shared.len() != features.n_samples() {
        features.select_samples(&shared)?
    } else {
        features
    };
    let features = drop_missing(features)?;

    let design = design.retain_samples(&shared);
    WideDesignDataset::new(features, design)
}

/// Remove every feature carrying at least one missing (NaN) value.
/// Infinite values are kept and reach the tests as they are.
fn drop_missing(features: FeatureTable) -> Result<FeatureTable> {
    let complete: Vec<usize> = (0..features.n_features())
        .filter(|&i| features.row(i).iter().all(|v| !v.is_nan()))
        .collect();

    if complete.len() == features.n_features() {
        return Ok(features);
    }

    let dropped: Vec<&String> = (0..features.n_features())
        .filter(|i| complete.binary_search(i).is_err())
        .map(|i| &features.feature_ids()[i])
        .collect();
    warn!(
        "{} feature(s) contain missing values and will be removed from the analysis",
        dropped.len()
    );
    debug!("Features removed for missing values: {:?}", dropped);

    features.select_features(&complete)
}
