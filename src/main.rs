use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{info, warn};

use pairwise_ttest::data::{TabularDataset, load_wide_design};
use pairwise_ttest::results::VOLCANO_CUTOFF;
use pairwise_ttest::results::writer::{write_flags_file, write_summary_file, write_volcano_file};
use pairwise_ttest::{AnalysisConfig, TestMode, run_ttest};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "pairwise-ttest";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Runs a t-test (paired or unpaired) for each feature in a wide dataset.")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .required(true)
                .help("Input dataset in wide format."),
        )
        .arg(
            Arg::new("design")
                .short('d')
                .long("design")
                .required(true)
                .help("Design file."),
        )
        .arg(
            Arg::new("uniqueID")
                .short('u')
                .long("uniqueID")
                .required(true)
                .help("Name of the column with unique identifiers."),
        )
        .arg(
            Arg::new("group")
                .short('g')
                .long("group")
                .required(true)
                .help("Name of the column with group variable."),
        )
        .arg(
            Arg::new("pairing")
                .short('p')
                .long("pairing")
                .required(true)
                .value_parser(clap::value_parser!(TestMode))
                .help("Choice of the test: has to be either paired or unpaired."),
        )
        .arg(
            Arg::new("order")
                .short('o')
                .long("order")
                .help("Name of the pairing variable if paired option is selected. Ignored when unpaired test is selected."),
        )
        .arg(
            Arg::new("summaries")
                .short('s')
                .long("summaries")
                .required(true)
                .help("Summaries file name. TSV format."),
        )
        .arg(
            Arg::new("flags")
                .short('f')
                .long("flags")
                .required(true)
                .help("Flags file. TSV format."),
        )
        .arg(
            Arg::new("volcano")
                .short('v')
                .long("volcano")
                .help("Volcano plot data. TSV format."),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_parser(clap::value_parser!(usize))
                .help("Number of worker threads (defaults to all cores)."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug messages."),
        )
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(id)
        .with_context(|| format!("--{} is required", id))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let input = required(matches, "input")?;
    let design = required(matches, "design")?;
    let unique_id = required(matches, "uniqueID")?;
    let group = required(matches, "group")?;
    let summaries = required(matches, "summaries")?;
    let flags = required(matches, "flags")?;
    let mode = matches
        .get_one::<TestMode>("pairing")
        .copied()
        .context("--pairing is required")?;
    let order = matches.get_one::<String>("order").cloned();

    info!(
        "Importing data with following parameters: Input: {} Design: {} UniqueID: {} Group: {} TestType: {} pairID: {}",
        input,
        design,
        unique_id,
        group,
        mode,
        order.as_deref().unwrap_or("<none>")
    );

    if let Some(&threads) = matches.get_one::<usize>("threads") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker thread pool")?;
    }

    let config = AnalysisConfig {
        mode,
        group_column: group.clone(),
        pairing_column: order,
        unique_id: unique_id.clone(),
    };

    let dataset = load_wide_design(input, design, unique_id)
        .with_context(|| format!("Failed to load {} with design {}", input, design))?;
    info!(
        "Loaded {} feature(s) across {} sample(s)",
        dataset.features().n_features(),
        dataset.features().n_samples()
    );

    let report = run_ttest(&dataset, &config).context("t-test failed")?;
    if !report.warnings.is_empty() {
        warn!("{} pairing unit(s) were removed", report.warnings.len());
    }

    write_summary_file(&report.summary, summaries)
        .with_context(|| format!("Failed to write summaries to {}", summaries))?;
    write_flags_file(&report.flags, flags)
        .with_context(|| format!("Failed to write flags to {}", flags))?;

    if let Some(volcano) = matches.get_one::<String>("volcano") {
        let series = report.volcano()?;
        write_volcano_file(&series, &config.unique_id, VOLCANO_CUTOFF, volcano)
            .with_context(|| format!("Failed to write volcano data to {}", volcano))?;
    }

    info!("Finishing running of t-test.");
    Ok(())
}

fn main() -> Result<()> {
    let matches = build_parser().get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    run(&matches)
}
