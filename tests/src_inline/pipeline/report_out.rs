use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::config::AnalysisConfig;
use crate::model::table::{RatingRow, RatingTable};
use crate::pipeline::run_analysis;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("raterqc_report_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_table() -> RatingTable {
    let rows = [
        ("GOVERN", "GV.OC", "GV.OC-01", [Some(1.0), Some(1.0)]),
        ("GOVERN", "GV.OC", "GV.OC-02", [Some(2.0), Some(2.0)]),
        ("GOVERN", "GV.OC", "GV.OC-03", [Some(0.0), Some(6.0)]),
        ("DETECT", "DE.CM", "DE.CM-01", [Some(3.0), None]),
    ];
    RatingTable {
        raters: vec!["Manager_1".to_string(), "Manager_2".to_string()],
        rows: rows
            .iter()
            .map(|(f, c, s, ratings)| RatingRow {
                function: f.to_string(),
                category: c.to_string(),
                subcategory: s.to_string(),
                ratings: ratings.to_vec(),
            })
            .collect(),
    }
}

fn sample_meta(table: &RatingTable) -> ReportMeta {
    ReportMeta {
        tool_name: "raterqc".to_string(),
        tool_version: "0.0.0".to_string(),
        input_path: "ratings.csv".to_string(),
        rater_source: "inferred".to_string(),
        raters: table.raters.clone(),
        n_rows: table.n_rows(),
        disagreement_threshold: 1.0,
        min_group_size: 3,
        group_order: "first-seen".to_string(),
        scale: None,
    }
}

#[test]
fn test_write_reports_creates_all_artifacts() {
    let table = sample_table();
    let output = run_analysis(&table, &AnalysisConfig::default());
    let meta = sample_meta(&table);
    let out_dir = make_temp_dir();

    write_reports(
        &ReportInput {
            meta: &meta,
            table: &table,
            output: &output,
        },
        &out_dir,
    )
    .unwrap();

    assert!(out_dir.join("dispersion.tsv").exists());
    assert!(out_dir.join("summary.json").exists());
    assert!(out_dir.join("report.txt").exists());
    fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn test_dispersion_tsv_blank_cells_for_missing() {
    let table = sample_table();
    let output = run_analysis(&table, &AnalysisConfig::default());
    let tsv = render_dispersion_tsv(&table, &output);

    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(
        lines[0],
        "Function\tCategory\tSubcategory\tManager_1\tManager_2\tstd_dev\trange"
    );
    assert_eq!(lines.len(), 1 + table.n_rows());

    // Last row has one present rating: missing score and std_dev stay blank,
    // range is 0 for a single rating.
    let fields: Vec<&str> = lines[4].split('\t').collect();
    assert_eq!(fields[3], "3");
    assert_eq!(fields[4], "");
    assert_eq!(fields[5], "");
    assert_eq!(fields[6], "0.000000");
}

#[test]
fn test_summary_json_is_valid_and_complete() {
    let table = sample_table();
    let output = run_analysis(&table, &AnalysisConfig::default());
    let meta = sample_meta(&table);
    let out_dir = make_temp_dir();

    write_reports(
        &ReportInput {
            meta: &meta,
            table: &table,
            output: &output,
        },
        &out_dir,
    )
    .unwrap();

    let json = fs::read_to_string(out_dir.join("summary.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(doc["tool"]["name"], "raterqc");
    assert_eq!(doc["input"]["n_rows"], 4);
    assert_eq!(doc["config"]["min_group_size"], 3);
    assert_eq!(doc["functions"].as_array().unwrap().len(), 2);
    // DE.CM has a single row: flagged, no matrix.
    let detect = &doc["functions"][1]["categories"][0];
    assert_eq!(detect["insufficient_data"], true);
    assert!(detect.get("correlation").is_none());
    fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn test_report_text_sections_present() {
    let table = sample_table();
    let output = run_analysis(&table, &AnalysisConfig::default());
    let meta = sample_meta(&table);
    let text = crate::report::text::render_report_text(&meta, &output);

    assert!(text.contains("Inter-Rater Agreement Report"));
    assert!(text.contains("high disagreement"));
    assert!(text.contains("Global inter-rater correlation (Spearman)"));
    assert!(text.contains("Function: GOVERN"));
    assert!(text.contains("insufficient data"));
}
