//! Group structure of the design table.
//!
//! [`partition`] splits the samples by group label; [`pairing`] validates the
//! one-to-one sample matching that a paired test requires.

use crate::data::DesignTable;
use crate::error::Result;
use std::collections::HashSet;

pub mod pairing;

pub use pairing::{PairValidator, PairingIssue, PairingUnit, PairingWarning, ValidatedPairing};

/// Samples of each group, with labels kept in first-seen design order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupPartition {
    groups: Vec<(String, Vec<String>)>,
}

impl GroupPartition {
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn n_samples(&self) -> usize {
        self.groups.iter().map(|(_, s)| s.len()).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(label, _)| label.as_str())
    }

    pub fn samples(&self, label: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, samples)| samples.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(label, samples)| (label.as_str(), samples.as_slice()))
    }

    pub fn group_of(&self, sample: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, samples)| samples.iter().any(|s| s == sample))
            .map(|(label, _)| label.as_str())
    }

    /// New partition holding only the samples in `keep`.
    ///
    /// Label order is preserved and groups left without samples are kept, so
    /// downstream checks see them as empty rather than missing.
    pub fn restrict(&self, keep: &HashSet<&str>) -> GroupPartition {
        GroupPartition {
            groups: self
                .groups
                .iter()
                .map(|(label, samples)| {
                    let kept = samples
                        .iter()
                        .filter(|s| keep.contains(s.as_str()))
                        .cloned()
                        .collect();
                    (label.clone(), kept)
                })
                .collect(),
        }
    }
}

/// Partition the design's samples by the values of `group_column`.
pub fn partition(design: &DesignTable, group_column: &str) -> Result<GroupPartition> {
    let labels = design.column(group_column)?;
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for (sample, label) in design.sample_ids().iter().zip(labels) {
        match groups.iter_mut().find(|(l, _)| l == label) {
            Some((_, samples)) => samples.push(sample.clone()),
            None => groups.push((label.to_string(), vec![sample.clone()])),
        }
    }

    Ok(GroupPartition { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TTestError;

    fn design(rows: &[(&str, &str)]) -> DesignTable {
        DesignTable::new(
            vec!["group".to_string()],
            rows.iter()
                .map(|(s, g)| (s.to_string(), vec![g.to_string()]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_partition_keeps_first_seen_order() {
        let design = design(&[("s1", "trt"), ("s2", "ctrl"), ("s3", "trt"), ("s4", "mid")]);
        let partition = partition(&design, "group").unwrap();
        assert_eq!(partition.labels().collect::<Vec<_>>(), vec!["trt", "ctrl", "mid"]);
        assert_eq!(
            partition.samples("trt").unwrap(),
            &["s1".to_string(), "s3".to_string()][..]
        );
        assert_eq!(partition.group_of("s2"), Some("ctrl"));
        assert_eq!(partition.n_samples(), 4);
    }

    #[test]
    fn test_partition_missing_column() {
        let design = design(&[("s1", "a")]);
        assert!(matches!(
            partition(&design, "treatment"),
            Err(TTestError::Schema { column, .. }) if column == "treatment"
        ));
    }

    #[test]
    fn test_single_group_is_not_an_error() {
        let design = design(&[("s1", "a"), ("s2", "a")]);
        let partition = partition(&design, "group").unwrap();
        assert_eq!(partition.n_groups(), 1);
    }

    #[test]
    fn test_restrict_keeps_labels_and_empty_groups() {
        let design = design(&[("s1", "a"), ("s2", "b"), ("s3", "a")]);
        let partition = partition(&design, "group").unwrap();
        let keep: HashSet<&str> = ["s3"].into_iter().collect();
        let restricted = partition.restrict(&keep);
        assert_eq!(restricted.labels().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(restricted.samples("a").unwrap(), &["s3".to_string()][..]);
        assert!(restricted.samples("b").unwrap().is_empty());
        assert_eq!(partition.n_samples(), 3);
    }
}
