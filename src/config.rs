use std::fmt;
use std::str::FromStr;

/// Which flavour of t-test to run.
///
/// `Unpaired` compares every pair of groups with an independent two-sample
/// test; `Paired` requires exactly two groups matched through a pairing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Paired,
    Unpaired,
}

impl FromStr for TestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paired" => Ok(TestMode::Paired),
            "unpaired" => Ok(TestMode::Unpaired),
            other => Err(format!(
                "test type has to be either 'paired' or 'unpaired', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestMode::Paired => write!(f, "paired"),
            TestMode::Unpaired => write!(f, "unpaired"),
        }
    }
}

/// Configuration surface of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub mode: TestMode,
    /// Design column holding the group labels.
    pub group_column: String,
    /// Design column holding the pairing identifiers. Ignored in unpaired mode.
    pub pairing_column: Option<String>,
    /// Name of the feature identifier column, used as the row key of every output.
    pub unique_id: String,
}

impl AnalysisConfig {
    pub fn unpaired(group_column: &str, unique_id: &str) -> Self {
        AnalysisConfig {
            mode: TestMode::Unpaired,
            group_column: group_column.to_string(),
            pairing_column: None,
            unique_id: unique_id.to_string(),
        }
    }

    pub fn paired(group_column: &str, pairing_column: &str, unique_id: &str) -> Self {
        AnalysisConfig {
            mode: TestMode::Paired,
            group_column: group_column.to_string(),
            pairing_column: Some(pairing_column.to_string()),
            unique_id: unique_id.to_string(),
        }
    }
}
