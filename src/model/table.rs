/// One rated item. `ratings` is aligned to the table's rater order; a `None`
/// entry is a missing score, which is not the same thing as a 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub function: String,
    pub category: String,
    pub subcategory: String,
    pub ratings: Vec<Option<f64>>,
}

impl RatingRow {
    /// Ratings that are actually present for this row.
    pub fn present_ratings(&self) -> impl Iterator<Item = f64> + '_ {
        self.ratings.iter().filter_map(|r| *r)
    }
}

/// Immutable rating table: resolved rater columns plus one row per item.
/// All derived structures (dispersion, correlation, group summaries) are
/// pure functions of this table.
#[derive(Debug, Clone)]
pub struct RatingTable {
    pub raters: Vec<String>,
    pub rows: Vec<RatingRow>,
}

impl RatingTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_raters(&self) -> usize {
        self.raters.len()
    }

    /// Column of one rater across a row subset, `None` where absent.
    pub fn rater_column<'a>(
        &'a self,
        rater_idx: usize,
        row_indices: &'a [usize],
    ) -> impl Iterator<Item = Option<f64>> + 'a {
        row_indices
            .iter()
            .map(move |&r| self.rows[r].ratings[rater_idx])
    }
}
