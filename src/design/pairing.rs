//! Pairing validation for the paired t-test.
//!
//! Every pairing identifier must name exactly two samples drawn from the two
//! different groups. Units that break this are removed as a whole and reported
//! as a [`PairingWarning`]; no unit is ever partially repaired.

use super::{GroupPartition, partition};
use crate::data::DesignTable;
use crate::error::{Result, TTestError};
use log::{info, warn};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Why a pairing unit was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingIssue {
    /// The identifier is shared by `count` samples instead of two.
    Cardinality { count: usize },
    /// Both samples of the unit belong to `group`.
    GroupConflict { group: String },
    /// The samples carry no pairing identifier at all.
    MissingIdentifier,
}

/// A removed pairing unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingWarning {
    pub pairing_id: String,
    pub issue: PairingIssue,
    pub samples: Vec<String>,
}

impl PairingWarning {
    /// Stable machine-readable reason.
    pub fn reason_code(&self) -> &'static str {
        match self.issue {
            PairingIssue::Cardinality { .. } => "cardinality",
            PairingIssue::GroupConflict { .. } => "group_conflict",
            PairingIssue::MissingIdentifier => "missing_identifier",
        }
    }
}

impl fmt::Display for PairingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            PairingIssue::Cardinality { count } => write!(
                f,
                "Number of samples for the pairID: {} is equal to {} and NOT equal to 2. Sample(s) {:?} will be removed from further analysis.",
                self.pairing_id, count, self.samples
            ),
            PairingIssue::GroupConflict { group } => write!(
                f,
                "Samples in pairID {} both have groupID {}. Should be different! Sample(s) {:?} will be removed from further analysis.",
                self.pairing_id, group, self.samples
            ),
            PairingIssue::MissingIdentifier => write!(
                f,
                "Sample(s) {:?} have no pairing identifier and will be removed from further analysis.",
                self.samples
            ),
        }
    }
}

/// A retained pair: one sample of each group sharing a pairing identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingUnit {
    pub pairing_id: String,
    /// Sample from the first group of the partition.
    pub first: String,
    /// Sample from the second group of the partition.
    pub second: String,
}

/// Outcome of validating the pairing structure.
#[derive(Debug, Clone)]
pub struct ValidatedPairing {
    /// The two group labels, in partition order.
    pub groups: (String, String),
    /// Retained units, ordered by pairing identifier ascending.
    pub units: Vec<PairingUnit>,
    pub warnings: Vec<PairingWarning>,
    /// Working copy of the design holding only the retained samples.
    pub design: DesignTable,
    /// Partition of the retained samples.
    pub partition: GroupPartition,
}

/// Grouping key of a pairing identifier: numeric identifiers are written in
/// their shortest form, so `1`, `1.0` and ` 1 ` all name the same unit.
pub fn pairing_key(raw: &str) -> String {
    let id = raw.trim();
    match id.parse::<f64>() {
        Ok(x) if x.is_finite() => (x + 0.0).to_string(),
        _ => id.to_string(),
    }
}

/// Order pairing identifiers numerically when both parse as numbers,
/// otherwise lexically. Numbers sort before text.
pub fn compare_pairing_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Validates and cleans the pairing structure of a design table.
#[derive(Debug, Clone)]
pub struct PairValidator<'a> {
    group_column: &'a str,
    pairing_column: Option<&'a str>,
}

impl<'a> PairValidator<'a> {
    pub fn new(group_column: &'a str, pairing_column: Option<&'a str>) -> Self {
        PairValidator {
            group_column,
            pairing_column,
        }
    }

    /// Check group count and pairing column, then drop every malformed unit.
    ///
    /// Each unit is judged against the original group membership, so the
    /// outcome does not depend on the order in which units are visited.
    pub fn validate(&self, design: &DesignTable) -> Result<ValidatedPairing> {
        let original = partition(design, self.group_column)?;
        if original.n_groups() != 2 {
            warn!(
                "The number of unique groups is {} and not 2 as expected. The paired t-test cannot be performed.",
                original.n_groups()
            );
            return Err(TTestError::UnsupportedGroupCount {
                found: original.n_groups(),
            });
        }

        let pairing_column = self.pairing_column.ok_or_else(|| {
            warn!("The required t-test pairing variable has not been provided");
            TTestError::MissingPairingColumn
        })?;
        let pairing_ids = design.column(pairing_column)?;

        let mut labels = original.labels();
        let (group_a, group_b) = match (labels.next(), labels.next()) {
            (Some(a), Some(b)) => (a.to_string(), b.to_string()),
            _ => {
                return Err(TTestError::UnsupportedGroupCount {
                    found: original.n_groups(),
                });
            }
        };

        let mut unit_order: Vec<String> = Vec::new();
        let mut members: HashMap<String, Vec<&String>> = HashMap::new();
        let mut unidentified: Vec<String> = Vec::new();
        for (sample, id) in design.sample_ids().iter().zip(pairing_ids) {
            if id.trim().is_empty() {
                unidentified.push(sample.clone());
                continue;
            }
            let key = pairing_key(id);
            members
                .entry(key.clone())
                .or_insert_with(|| {
                    unit_order.push(key);
                    Vec::new()
                })
                .push(sample);
        }

        let mut warnings = Vec::new();
        if !unidentified.is_empty() {
            warnings.push(PairingWarning {
                pairing_id: String::new(),
                issue: PairingIssue::MissingIdentifier,
                samples: unidentified,
            });
        }

        let mut units = Vec::new();
        for id in unit_order {
            let samples = &members[&id];
            if samples.len() != 2 {
                warnings.push(PairingWarning {
                    pairing_id: id.to_string(),
                    issue: PairingIssue::Cardinality {
                        count: samples.len(),
                    },
                    samples: samples.iter().map(|s| s.to_string()).collect(),
                });
                continue;
            }

            let g0 = original.group_of(samples[0]).unwrap_or_default();
            let g1 = original.group_of(samples[1]).unwrap_or_default();
            if g0 == g1 {
                warnings.push(PairingWarning {
                    pairing_id: id.to_string(),
                    issue: PairingIssue::GroupConflict {
                        group: g0.to_string(),
                    },
                    samples: samples.iter().map(|s| s.to_string()).collect(),
                });
                continue;
            }

            let (first, second) = if g0 == group_a {
                (samples[0].clone(), samples[1].clone())
            } else {
                (samples[1].clone(), samples[0].clone())
            };
            units.push(PairingUnit {
                pairing_id: id.to_string(),
                first,
                second,
            });
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        if units.is_empty() {
            warn!("Number of paired samples in the final dataset is exactly 0!");
            return Err(TTestError::NoPairedSamples);
        }

        units.sort_by(|a, b| compare_pairing_ids(&a.pairing_id, &b.pairing_id));

        let keep: HashSet<&str> = units
            .iter()
            .flat_map(|u| [u.first.as_str(), u.second.as_str()])
            .collect();
        let working = design.retain_samples(&keep);
        let cleaned = original.restrict(&keep);

        info!(
            "{} pair(s) retained for groups {} and {}; {} sample(s) removed",
            units.len(),
            group_a,
            group_b,
            design.len() - working.len()
        );

        Ok(ValidatedPairing {
            groups: (group_a, group_b),
            units,
            warnings,
            design: working,
            partition: cleaned,
        })
    }
}
