pub mod correlation;
pub mod dispersion;
pub mod grouping;
pub mod report_out;

use tracing::info;

use crate::model::config::AnalysisConfig;
use crate::model::table::RatingTable;
use correlation::{CorrelationMatrix, correlation_matrix};
use dispersion::{HighDisagreement, RowDispersion, compute_dispersion, high_disagreement};
use grouping::{FunctionGroup, group_summaries};

/// The three renderer-agnostic outputs of the analysis core. Everything
/// here is a pure function of the loaded table and config; rerunning on
/// the same input reproduces it exactly.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub dispersion: Vec<RowDispersion>,
    pub high_disagreement: HighDisagreement,
    /// Suppressed (with `global_insufficient` set) below 2 rows.
    pub global: Option<CorrelationMatrix>,
    pub global_mean_offdiag: Option<f64>,
    pub global_insufficient: bool,
    pub functions: Vec<FunctionGroup>,
}

pub fn run_analysis(table: &RatingTable, config: &AnalysisConfig) -> AnalysisOutput {
    let dispersion = compute_dispersion(table);
    let high = high_disagreement(table, &dispersion, config.disagreement_threshold);
    info!(
        "dispersion computed: {} rows, {} above threshold {}",
        table.n_rows(),
        high.items.len(),
        config.disagreement_threshold
    );

    let all_rows: Vec<usize> = (0..table.n_rows()).collect();
    let (global, global_mean_offdiag, global_insufficient) = if table.n_rows() >= 2 {
        let matrix = correlation_matrix(table, &all_rows);
        let mean = matrix.mean_offdiag();
        (Some(matrix), mean, false)
    } else {
        (None, None, true)
    };

    let functions = group_summaries(table, config);
    let n_groups: usize = functions.iter().map(|f| f.categories.len()).sum();
    info!(
        "grouped correlation: {} functions, {} category groups",
        functions.len(),
        n_groups
    );

    AnalysisOutput {
        dispersion,
        high_disagreement: high,
        global,
        global_mean_offdiag,
        global_insufficient,
        functions,
    }
}
