use crate::config::{AnalysisConfig, TestMode};
use crate::data::TabularDataset;
use crate::design::{PairValidator, PairingWarning, partition};
use crate::error::Result;
use crate::results::{FlagTable, ResultAssembler, SummaryTable, VolcanoDataBuilder, VolcanoSeries};
use crate::testing::{GroupPair, GroupPairResult, PairwiseTestEngine};
use log::info;

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct TTestReport {
    pub mode: TestMode,
    pub results: Vec<GroupPairResult>,
    pub summary: SummaryTable,
    pub flags: FlagTable,
    /// Pairing units removed during validation; always empty in unpaired mode.
    pub warnings: Vec<PairingWarning>,
}

impl TTestReport {
    pub fn pairs(&self) -> Vec<GroupPair> {
        self.results.iter().map(|r| r.pair.clone()).collect()
    }

    pub fn volcano(&self) -> Result<Vec<VolcanoSeries>> {
        VolcanoDataBuilder::build(&self.summary, &self.pairs())
    }
}

/// Run the configured t-test over every feature of `dataset`.
///
/// The dataset is never modified; paired-mode cleaning works on a copy of the
/// design and only removes samples, so the output rows are exactly the
/// dataset's features in their original order.
pub fn run_ttest<D>(dataset: &D, config: &AnalysisConfig) -> Result<TTestReport>
where
    D: TabularDataset + ?Sized,
{
    let features = dataset.features();
    let design = dataset.design();
    let engine = PairwiseTestEngine::new(features);

    let (stats, results, warnings) = match config.mode {
        TestMode::Unpaired => {
            let groups = partition(design, &config.group_column)?;
            let stats = engine.describe(&groups)?;
            let results = engine.run_unpaired(&groups)?;
            (stats, results, Vec::new())
        }
        TestMode::Paired => {
            info!(
                "Paired test will be performed for two groups based on pairing variable: {}",
                config.pairing_column.as_deref().unwrap_or("<none>")
            );
            let pairing = PairValidator::new(&config.group_column, config.pairing_column.as_deref())
                .validate(design)?;
            let stats = engine.describe(&pairing.partition)?;
            let results = engine.run_paired(&pairing)?;
            (stats, results, pairing.warnings)
        }
    };

    let assembler = ResultAssembler::new(config.mode, &config.unique_id);
    let (summary, flags) = assembler.assemble(features.feature_ids(), &stats, &results)?;

    info!(
        "Finished {} t-test: {} feature(s), {} group pair(s)",
        config.mode,
        features.n_features(),
        results.len()
    );

    Ok(TTestReport {
        mode: config.mode,
        results,
        summary,
        flags,
        warnings,
    })
}
