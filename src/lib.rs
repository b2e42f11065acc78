//! # pairwise-ttest
//!
//! Per-feature group comparison for wide feature tables, part of the single-rust ecosystem.
//!
//! A wide table (features as rows, samples as columns) is annotated by a design table that
//! assigns every sample to a group and, optionally, to a pairing unit. For each feature this
//! crate runs either independent two-sample t-tests across every pair of groups, or a paired
//! t-test between exactly two groups whose samples are matched through the pairing column.
//!
//! ## Core Features
//!
//! - **Unpaired mode**: Student's t-test for all C(g, 2) group combinations
//! - **Paired mode**: pairing validation that drops malformed pairing units with structured
//!   warnings, then a related-samples t-test over the matched series
//! - **Summary and flag tables**: grand mean, sample variance, group means, t-statistics,
//!   p-values, `-log10(p)`, signed differences and 0.01/0.05/0.10 significance flags
//! - **Volcano series**: difference against `-log10(p)` per group pair for plotting
//!
//! ## Quick Start
//!
//! Load a [`data::WideDesignDataset`] with [`data::load_wide_design`], describe the run with
//! an [`config::AnalysisConfig`] and call [`pipeline::run_ttest`].
//!
//! ## Module Organization
//!
//! - **[`data`]**: Feature and design tables and the tab-delimited loader
//! - **[`design`]**: Group partitioning and pairing validation
//! - **[`testing`]**: t-test kernels and the pairwise test engine
//! - **[`results`]**: Summary/flag assembly, volcano series and writers

pub mod config;
pub mod data;
pub mod design;
pub mod error;
pub mod pipeline;
pub mod results;
pub mod testing;

pub use config::{AnalysisConfig, TestMode};
pub use error::TTestError;
pub use pipeline::{TTestReport, run_ttest};
