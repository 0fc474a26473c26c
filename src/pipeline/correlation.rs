use crate::model::table::RatingTable;

/// Pairwise Spearman correlations over a row scope. Symmetric, diagonal
/// exactly 1.0. Degenerate pairs (fewer than 2 usable rows, or constant
/// ranks) hold NaN; consumers render those as undefined.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub raters: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn n(&self) -> usize {
        self.raters.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Mean of the off-diagonal entries: (sum(M) - N) / (N^2 - N).
    /// `None` when N < 2; NaN entries propagate into the mean.
    pub fn mean_offdiag(&self) -> Option<f64> {
        let n = self.n();
        if n < 2 {
            return None;
        }
        let sum: f64 = self.values.iter().flatten().sum();
        Some((sum - n as f64) / ((n * n - n) as f64))
    }
}

/// 1-based ranks with ties averaged, the standard Spearman rank transform.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0usize;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Tie run [i, j] shares the mean of ranks i+1 ..= j+1.
        let shared = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = shared;
        }
        i = j + 1;
    }
    ranks
}

/// Pearson product-moment correlation; NaN when either side is constant
/// or fewer than 2 observations are supplied.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for k in 0..n {
        let dx = x[k] - mean_x;
        let dy = y[k] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    cov / denom
}

/// Spearman rank correlation: Pearson over tie-averaged ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    let rx = average_ranks(x);
    let ry = average_ranks(y);
    pearson(&rx, &ry)
}

/// Builds the pairwise matrix over the rows in scope. Each unordered pair
/// uses only the rows where both raters are present, and ranks are taken
/// within that common subset.
pub fn correlation_matrix(table: &RatingTable, row_indices: &[usize]) -> CorrelationMatrix {
    let n = table.n_raters();
    let mut values = vec![vec![f64::NAN; n]; n];
    for (i, row) in values.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let mut xs = Vec::with_capacity(row_indices.len());
            let mut ys = Vec::with_capacity(row_indices.len());
            for pair in table
                .rater_column(i, row_indices)
                .zip(table.rater_column(j, row_indices))
            {
                if let (Some(x), Some(y)) = pair {
                    xs.push(x);
                    ys.push(y);
                }
            }
            let rho = spearman(&xs, &ys);
            values[i][j] = rho;
            values[j][i] = rho;
        }
    }

    CorrelationMatrix {
        raters: table.raters.clone(),
        values,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/correlation.rs"]
mod tests;
