// Integration tests for the pairwise_ttest crate
// End-to-end runs from tab-delimited files through the summary, flag and volcano outputs.

#[cfg(test)]
mod integration_tests {
    use pairwise_ttest::data::load_wide_design;
    use pairwise_ttest::design::PairingIssue;
    use pairwise_ttest::results::writer::{write_flags_file, write_summary_file, write_volcano_file};
    use pairwise_ttest::results::VOLCANO_CUTOFF;
    use pairwise_ttest::{AnalysisConfig, TTestError, run_ttest};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    const UNPAIRED_WIDE: &str = "rowID\ta1\ta2\ta3\tb1\tb2\tb3\tc1\tc2\tc3
met3\t1.0\t1.2\t0.9\t5.0\t5.1\t4.8\t1.1\t0.8\t1.0
met1\t2.0\t2.5\t2.2\t2.1\t2.4\t2.3\t2.2\t2.0\t2.6
met2\t7.0\t7.0\t7.0\t7.0\t7.0\t7.0\t7.0\t7.0\t7.0
";

    const UNPAIRED_DESIGN: &str = "sampleID\ttreatment
a1\tA
a2\tA
a3\tA
b1\tB
b2\tB
b3\tB
c1\tC
c2\tC
c3\tC
";

    #[test]
    fn test_unpaired_end_to_end() {
        let dir = TempDir::new().unwrap();
        let wide = write(dir.path(), "wide.tsv", UNPAIRED_WIDE);
        let design = write(dir.path(), "design.tsv", UNPAIRED_DESIGN);

        let dataset = load_wide_design(&wide, &design, "rowID").unwrap();
        let config = AnalysisConfig::unpaired("treatment", "rowID");
        let report = run_ttest(&dataset, &config).unwrap();

        // rows: same features, same order, in both tables
        let expected_rows = vec!["met3", "met1", "met2"];
        assert_eq!(report.summary.feature_ids, expected_rows);
        assert_eq!(report.flags.feature_ids, expected_rows);

        // C(3, 2) pairs in first-seen order
        let labels: Vec<String> = report.results.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["A_B", "A_C", "B_C"]);
        assert_eq!(report.flags.columns.len(), 9);
        assert_eq!(report.summary.columns.len(), 2 + 3 + 3 * 4);
        assert!(report.warnings.is_empty());

        // met3 separates B from A and C
        assert_eq!(report.flags.get("met3", "flag_significant_0p01_on_A_B"), Some(true));
        assert_eq!(report.flags.get("met3", "flag_significant_0p10_on_A_C"), Some(false));
        assert!(report.summary.get("met3", "diff_of_A_B").unwrap() < 0.0);
        assert!(report.summary.get("met3", "diff_of_B_C").unwrap() > 0.0);

        // met2 is constant everywhere: undefined statistic, no flags
        assert!(report.summary.get("met2", "t_value_for_diff_A_B").unwrap().is_nan());
        assert!(report.summary.get("met2", "prob_greater_than_t_for_diff_A_B").unwrap().is_nan());
        for column in &report.flags.columns {
            assert_eq!(report.flags.get("met2", column), Some(false));
        }

        println!("=== UNPAIRED SUMMARY COLUMNS ===");
        println!("{:?}", report.summary.columns);
    }

    #[test]
    fn test_unpaired_outputs_written() {
        let dir = TempDir::new().unwrap();
        let wide = write(dir.path(), "wide.tsv", UNPAIRED_WIDE);
        let design = write(dir.path(), "design.tsv", UNPAIRED_DESIGN);

        let dataset = load_wide_design(&wide, &design, "rowID").unwrap();
        let report = run_ttest(&dataset, &AnalysisConfig::unpaired("treatment", "rowID")).unwrap();

        let summary_path = dir.path().join("summary.tsv");
        let flags_path = dir.path().join("flags.tsv");
        let volcano_path = dir.path().join("volcano.tsv");
        write_summary_file(&report.summary, &summary_path).unwrap();
        write_flags_file(&report.flags, &flags_path).unwrap();
        write_volcano_file(&report.volcano().unwrap(), "rowID", VOLCANO_CUTOFF, &volcano_path).unwrap();

        let summary = fs::read_to_string(&summary_path).unwrap();
        let mut lines = summary.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("rowID\tGrandMean\tSampleVariance\tmean_treatment_A\tmean_treatment_B\tmean_treatment_C\tt_value_for_diff_A_B"));
        let first_ids: Vec<&str> = lines.map(|l| l.split('\t').next().unwrap()).collect();
        assert_eq!(first_ids, vec!["met3", "met1", "met2"]);

        // every written number carries at most four decimals
        for line in summary.lines().skip(1) {
            for cell in line.split('\t').skip(1) {
                if let Some((_, decimals)) = cell.split_once('.') {
                    assert!(decimals.len() <= 4, "cell {} is not rounded", cell);
                }
            }
        }

        let flags = fs::read_to_string(&flags_path).unwrap();
        assert!(flags.starts_with("rowID\tflag_significant_0p01_on_A_B\tflag_significant_0p05_on_A_B\tflag_significant_0p10_on_A_B"));
        assert!(flags.lines().skip(1).all(|l| l.split('\t').skip(1).all(|c| c == "0" || c == "1")));

        let volcano = fs::read_to_string(&volcano_path).unwrap();
        // header + 3 pairs x 3 features
        assert_eq!(volcano.lines().count(), 1 + 9);
    }

    const PAIRED_WIDE: &str = "rowID\tc1\tt1\tc2\tt2\tc3\tc4\tt4
m1\t1.0\t2.0\t2.0\t3.5\t50.0\t3.0\t4.2
m2\t1.0\t1.0\t2.0\t2.0\t9.0\t4.0\t4.0
";

    const PAIRED_DESIGN: &str = "sampleID\tgroup\tpair
c1\tctrl\t1
t1\ttrt\t1
c2\tctrl\t2
t2\ttrt\t2
c3\tctrl\t3
c4\tctrl\t4
t4\ttrt\t4
";

    #[test]
    fn test_paired_end_to_end() {
        let dir = TempDir::new().unwrap();
        let wide = write(dir.path(), "wide.tsv", PAIRED_WIDE);
        let design = write(dir.path(), "design.tsv", PAIRED_DESIGN);

        let dataset = load_wide_design(&wide, &design, "rowID").unwrap();
        let config = AnalysisConfig::paired("group", "pair", "rowID");
        let report = run_ttest(&dataset, &config).unwrap();

        // pairID 3 has a single sample and is dropped with a structured warning
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].pairing_id, "3");
        assert_eq!(report.warnings[0].issue, PairingIssue::Cardinality { count: 1 });
        assert_eq!(report.warnings[0].samples, vec!["c3".to_string()]);

        // features are never dropped by pairing cleanup
        assert_eq!(report.summary.feature_ids, vec!["m1", "m2"]);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].label(), "ctrl_trt");

        assert_eq!(
            report.flags.columns,
            vec![
                "flag_value_diff_signif_ctrl_trt_0p01",
                "flag_value_diff_signif_ctrl_trt_0p05",
                "flag_value_diff_signif_ctrl_trt_0p10",
            ]
        );

        // c3 = 50.0 must not leak into any statistic
        let grand_mean = report.summary.get("m1", "GrandMean").unwrap();
        assert!((grand_mean - (1.0 + 2.0 + 2.0 + 3.5 + 3.0 + 4.2) / 6.0).abs() < 1e-12);
        let ctrl_mean = report.summary.get("m1", "mean_treatment_ctrl").unwrap();
        assert!((ctrl_mean - 2.0).abs() < 1e-12);

        // m2 is identical across each pair: undefined, no flags
        assert!(report.summary.get("m2", "t_value_for_diff_ctrl_trt").unwrap().is_nan());
        assert_eq!(report.flags.get("m2", "flag_value_diff_signif_ctrl_trt_0p10"), Some(false));
    }

    #[test]
    fn test_paired_with_three_groups_is_fatal() {
        let dir = TempDir::new().unwrap();
        let wide = write(dir.path(), "wide.tsv", UNPAIRED_WIDE);
        let design = write(
            dir.path(),
            "design.tsv",
            "sampleID\ttreatment\tpair\na1\tA\t1\na2\tA\t2\na3\tA\t3\nb1\tB\t1\nb2\tB\t2\nb3\tB\t3\nc1\tC\t1\nc2\tC\t2\nc3\tC\t3\n",
        );
        let dataset = load_wide_design(&wide, &design, "rowID").unwrap();
        let err = run_ttest(&dataset, &AnalysisConfig::paired("treatment", "pair", "rowID")).unwrap_err();
        assert!(matches!(err, TTestError::UnsupportedGroupCount { found: 3 }));
    }

    #[test]
    fn test_missing_group_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let wide = write(dir.path(), "wide.tsv", UNPAIRED_WIDE);
        let design = write(dir.path(), "design.tsv", UNPAIRED_DESIGN);
        let dataset = load_wide_design(&wide, &design, "rowID").unwrap();
        let err = run_ttest(&dataset, &AnalysisConfig::unpaired("batch", "rowID")).unwrap_err();
        assert!(matches!(err, TTestError::Schema { column, .. } if column == "batch"));
    }

    #[test]
    fn test_paired_without_pairing_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let wide = write(dir.path(), "wide.tsv", PAIRED_WIDE);
        let design = write(dir.path(), "design.tsv", PAIRED_DESIGN);
        let dataset = load_wide_design(&wide, &design, "rowID").unwrap();

        let mut config = AnalysisConfig::paired("group", "pair", "rowID");
        config.pairing_column = None;
        let err = run_ttest(&dataset, &config).unwrap_err();
        assert!(matches!(err, TTestError::MissingPairingColumn));
    }
}
