pub mod json;
pub mod text;

/// Run-level context the renderers share; assembled by the caller from the
/// input bundle and config, never from renderer state.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub tool_name: String,
    pub tool_version: String,
    pub input_path: String,
    pub rater_source: String,
    pub raters: Vec<String>,
    pub n_rows: usize,
    pub disagreement_threshold: f64,
    pub min_group_size: usize,
    pub group_order: String,
    pub scale: Option<(f64, f64)>,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{v:.6}")
}

/// Correlation cell formatting: fixed width, NaN rendered as undefined.
pub fn format_corr(v: f64) -> String {
    if v.is_nan() {
        "NA".to_string()
    } else {
        format!("{v:.3}")
    }
}
