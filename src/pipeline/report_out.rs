use std::fs;
use std::path::Path;

use tracing::info;

use crate::model::table::RatingTable;
use crate::pipeline::AnalysisOutput;
use crate::report::json::{build_summary, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{ReportMeta, format_f64_6};

#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub meta: &'a ReportMeta,
    pub table: &'a RatingTable,
    pub output: &'a AnalysisOutput,
}

/// Writes the three artifacts into `out_dir`: per-row `dispersion.tsv`,
/// machine-readable `summary.json`, human-readable `report.txt`.
pub fn write_reports(input: &ReportInput, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    let dispersion_path = out_dir.join("dispersion.tsv");
    fs::write(
        &dispersion_path,
        render_dispersion_tsv(input.table, input.output),
    )?;
    info!("wrote {}", dispersion_path.display());

    let summary_path = out_dir.join("summary.json");
    let doc = build_summary(input.meta, input.output);
    let json = render_summary_json(&doc).map_err(std::io::Error::other)?;
    fs::write(&summary_path, json)?;
    info!("wrote {}", summary_path.display());

    let report_path = out_dir.join("report.txt");
    fs::write(&report_path, render_report_text(input.meta, input.output))?;
    info!("wrote {}", report_path.display());

    Ok(())
}

/// One line per item: identifiers, raw per-rater scores, std dev, range.
/// Missing scores and undefined statistics are blank cells, never zeros.
fn render_dispersion_tsv(table: &RatingTable, output: &AnalysisOutput) -> String {
    let mut out = String::new();

    out.push_str("Function\tCategory\tSubcategory");
    for rater in &table.raters {
        out.push('\t');
        out.push_str(rater);
    }
    out.push_str("\tstd_dev\trange\n");

    for (row, disp) in table.rows.iter().zip(&output.dispersion) {
        out.push_str(&row.function);
        out.push('\t');
        out.push_str(&row.category);
        out.push('\t');
        out.push_str(&row.subcategory);
        for rating in &row.ratings {
            out.push('\t');
            if let Some(v) = rating {
                out.push_str(&format!("{v}"));
            }
        }
        out.push('\t');
        if let Some(s) = disp.std_dev {
            out.push_str(&format_f64_6(s));
        }
        out.push('\t');
        if let Some(r) = disp.range {
            out.push_str(&format_f64_6(r));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/report_out.rs"]
mod tests;
