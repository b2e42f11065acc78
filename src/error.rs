use thiserror::Error;

/// Fatal conditions that abort a t-test run.
///
/// Recoverable problems (a malformed pairing unit, a degenerate feature) never
/// surface here; they are reported through [`crate::design::PairingWarning`]
/// or as not-a-number cells in the results.
#[derive(Error, Debug)]
pub enum TTestError {
    #[error("Required column '{column}' not found in {table}")]
    Schema { table: &'static str, column: String },

    #[error("The number of unique groups is {found} and not 2 as expected. The paired t-test cannot be performed.")]
    UnsupportedGroupCount { found: usize },

    #[error("The paired t-test requires a pairing column, but none was provided")]
    MissingPairingColumn,

    #[error("Number of paired samples in the final dataset is exactly 0! Please check the design file for accuracy.")]
    NoPairedSamples,

    #[error("Group '{group}' has no samples, cannot compare {pair}")]
    EmptyGroup { group: String, pair: String },

    #[error("Feature identifier '{0}' appears more than once")]
    DuplicateFeature(String),

    #[error("Sample identifier '{0}' appears more than once in the design table")]
    DuplicateSample(String),

    #[error("Sample '{0}' has no row in the design table")]
    UnknownSample(String),

    #[error("Feature '{feature}' has {found} values but {expected} samples were declared")]
    RaggedRow {
        feature: String,
        found: usize,
        expected: usize,
    },

    #[error("Result column '{column}' has {found} rows but the feature table has {expected}")]
    ResultShape {
        column: String,
        found: usize,
        expected: usize,
    },

    #[error("The wide table and the design table share no sample identifiers")]
    NoSharedSamples,

    #[error(transparent)]
    Inference(#[from] anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TTestError>;
