use crate::model::config::{AnalysisConfig, GroupOrder};
use crate::model::table::RatingTable;
use crate::pipeline::correlation::{CorrelationMatrix, correlation_matrix};

/// Agreement summary for one (Function, Category) group. Groups smaller
/// than `min_group_size` carry no matrix and are flagged instead.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub function: String,
    pub category: String,
    pub row_count: usize,
    pub insufficient_data: bool,
    pub correlation: Option<CorrelationMatrix>,
    pub mean_offdiag: Option<f64>,
}

/// One function with its category summaries, in emit order.
#[derive(Debug, Clone)]
pub struct FunctionGroup {
    pub function: String,
    pub categories: Vec<GroupSummary>,
}

/// Partitions rows by function, then by category within each function, and
/// runs the correlation aggregator per group. Empty groups never exist by
/// construction: keys come from the rows themselves.
pub fn group_summaries(table: &RatingTable, config: &AnalysisConfig) -> Vec<FunctionGroup> {
    let mut functions: Vec<String> = Vec::new();
    for row in &table.rows {
        if !functions.contains(&row.function) {
            functions.push(row.function.clone());
        }
    }
    if config.group_order == GroupOrder::Sorted {
        functions.sort();
    }

    let mut out = Vec::with_capacity(functions.len());
    for function in functions {
        let func_rows: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.function == function)
            .map(|(i, _)| i)
            .collect();

        let mut categories: Vec<String> = Vec::new();
        for &r in &func_rows {
            let cat = &table.rows[r].category;
            if !categories.contains(cat) {
                categories.push(cat.clone());
            }
        }
        if config.group_order == GroupOrder::Sorted {
            categories.sort();
        }

        let mut summaries = Vec::with_capacity(categories.len());
        for category in categories {
            let group_rows: Vec<usize> = func_rows
                .iter()
                .copied()
                .filter(|&r| table.rows[r].category == category)
                .collect();
            summaries.push(summarize_group(
                table,
                &function,
                &category,
                &group_rows,
                config.min_group_size,
            ));
        }

        out.push(FunctionGroup {
            function,
            categories: summaries,
        });
    }
    out
}

fn summarize_group(
    table: &RatingTable,
    function: &str,
    category: &str,
    group_rows: &[usize],
    min_group_size: usize,
) -> GroupSummary {
    let row_count = group_rows.len();
    if row_count < min_group_size {
        return GroupSummary {
            function: function.to_string(),
            category: category.to_string(),
            row_count,
            insufficient_data: true,
            correlation: None,
            mean_offdiag: None,
        };
    }
    let matrix = correlation_matrix(table, group_rows);
    let mean_offdiag = matrix.mean_offdiag();
    GroupSummary {
        function: function.to_string(),
        category: category.to_string(),
        row_count,
        insufficient_data: false,
        correlation: Some(matrix),
        mean_offdiag,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/grouping.rs"]
mod tests;
