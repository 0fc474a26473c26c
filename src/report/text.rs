use crate::pipeline::AnalysisOutput;
use crate::pipeline::correlation::CorrelationMatrix;
use crate::pipeline::grouping::GroupSummary;
use crate::report::{ReportMeta, format_corr, format_f64_6};

pub fn render_report_text(meta: &ReportMeta, output: &AnalysisOutput) -> String {
    let mut out = String::new();

    out.push_str("Inter-Rater Agreement Report\n");
    out.push_str("============================\n\n");

    out.push_str("1. Dataset\n");
    out.push_str(&format!("Input: {}\n", meta.input_path));
    out.push_str(&format!("Rows: {}\n", meta.n_rows));
    out.push_str(&format!(
        "Raters ({}): {}\n",
        meta.rater_source,
        meta.raters.join(", ")
    ));
    out.push_str(&format!("Group order: {}\n", meta.group_order));
    if let Some((min, max)) = meta.scale {
        out.push_str(&format!("Rating scale: {min}..{max}\n"));
    }
    out.push('\n');

    out.push_str(&format!(
        "2. Subcategories with high disagreement (std dev > {}) [count: {}]\n",
        meta.disagreement_threshold,
        output.high_disagreement.items.len()
    ));
    if output.high_disagreement.items.is_empty() {
        out.push_str("None.\n");
    } else {
        render_disagreement_table(&mut out, output);
    }
    out.push('\n');

    out.push_str("3. Global inter-rater correlation (Spearman)\n");
    match &output.global {
        Some(matrix) => {
            render_matrix(&mut out, matrix);
            match output.global_mean_offdiag {
                Some(mean) if !mean.is_nan() => {
                    out.push_str(&format!("Mean off-diagonal: {}\n", format_f64_6(mean)));
                }
                _ => out.push_str("Mean off-diagonal: undefined\n"),
            }
        }
        None => out.push_str("Insufficient data (fewer than 2 rows).\n"),
    }
    out.push('\n');

    out.push_str("4. Correlation by function and category\n");
    for func in &output.functions {
        out.push_str(&format!("\nFunction: {}\n", func.function));
        for group in &func.categories {
            render_group(&mut out, group, meta.min_group_size);
        }
    }

    out
}

fn render_disagreement_table(out: &mut String, output: &AnalysisOutput) {
    let items = &output.high_disagreement.items;
    let func_w = column_width("Function", items.iter().map(|i| i.function.len()));
    let cat_w = column_width("Category", items.iter().map(|i| i.category.len()));
    let sub_w = column_width("Subcategory", items.iter().map(|i| i.subcategory.len()));

    out.push_str(&format!(
        "{:<func_w$}  {:<cat_w$}  {:<sub_w$}  {}\n",
        "Function", "Category", "Subcategory", "StdDev"
    ));
    for item in items {
        out.push_str(&format!(
            "{:<func_w$}  {:<cat_w$}  {:<sub_w$}  {}\n",
            item.function,
            item.category,
            item.subcategory,
            format_f64_6(item.std_dev)
        ));
    }
}

fn render_group(out: &mut String, group: &GroupSummary, min_group_size: usize) {
    if group.insufficient_data {
        out.push_str(&format!(
            "  {} (rows: {}): insufficient data (< {} rows)\n",
            group.category, group.row_count, min_group_size
        ));
        return;
    }
    match group.mean_offdiag {
        Some(mean) if !mean.is_nan() => out.push_str(&format!(
            "  {} (rows: {}, avg corr: {:.2})\n",
            group.category, group.row_count, mean
        )),
        _ => out.push_str(&format!(
            "  {} (rows: {}, avg corr: undefined)\n",
            group.category, group.row_count
        )),
    }
    if let Some(matrix) = &group.correlation {
        render_matrix(out, matrix);
    }
}

/// Aligned numeric grid, the textual stand-in for a heatmap.
pub fn render_matrix(out: &mut String, matrix: &CorrelationMatrix) {
    let name_w = matrix.raters.iter().map(|r| r.len()).max().unwrap_or(0);
    let cell_w = name_w.max(6);

    out.push_str(&format!("{:name_w$}", ""));
    for rater in &matrix.raters {
        out.push_str(&format!("  {rater:>cell_w$}"));
    }
    out.push('\n');

    for (i, rater) in matrix.raters.iter().enumerate() {
        out.push_str(&format!("{rater:<name_w$}"));
        for j in 0..matrix.n() {
            out.push_str(&format!("  {:>cell_w$}", format_corr(matrix.get(i, j))));
        }
        out.push('\n');
    }
}

fn column_width(header: &str, lens: impl Iterator<Item = usize>) -> usize {
    lens.chain(std::iter::once(header.len())).max().unwrap_or(0)
}
