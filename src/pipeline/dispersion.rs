use crate::model::table::RatingTable;

/// Per-row agreement dispersion. `std_dev` is the sample standard deviation
/// (N-1) over present ratings and is undefined below 2 raters; `range` is
/// max - min and is defined from a single rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowDispersion {
    pub std_dev: Option<f64>,
    pub range: Option<f64>,
}

pub fn compute_dispersion(table: &RatingTable) -> Vec<RowDispersion> {
    table
        .rows
        .iter()
        .map(|row| {
            let values: Vec<f64> = row.present_ratings().collect();
            RowDispersion {
                std_dev: sample_std_dev(&values),
                range: value_range(&values),
            }
        })
        .collect()
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

fn value_range(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Some(max - min)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisagreementItem {
    pub function: String,
    pub category: String,
    pub subcategory: String,
    pub std_dev: f64,
}

#[derive(Debug, Clone)]
pub struct HighDisagreement {
    pub threshold: f64,
    pub items: Vec<DisagreementItem>,
}

/// Rows whose std dev exceeds the threshold, sorted descending by std dev.
/// Ties keep input order so repeated runs emit identical reports.
pub fn high_disagreement(
    table: &RatingTable,
    dispersion: &[RowDispersion],
    threshold: f64,
) -> HighDisagreement {
    let mut indexed: Vec<(usize, f64)> = dispersion
        .iter()
        .enumerate()
        .filter_map(|(idx, d)| d.std_dev.map(|s| (idx, s)))
        .filter(|&(_, s)| s > threshold)
        .collect();
    indexed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let items = indexed
        .into_iter()
        .map(|(idx, std_dev)| {
            let row = &table.rows[idx];
            DisagreementItem {
                function: row.function.clone(),
                category: row.category.clone(),
                subcategory: row.subcategory.clone(),
                std_dev,
            }
        })
        .collect();

    HighDisagreement { threshold, items }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/dispersion.rs"]
mod tests;
