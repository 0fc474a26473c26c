/// Order in which group keys are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Order of first appearance in the input table.
    #[default]
    FirstSeen,
    /// Lexicographic by key.
    Sorted,
}

/// Inclusive rating scale bounds. When configured, scores outside the scale
/// are rejected as malformed input; when absent, values pass through as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Rows with std dev above this land in the high-disagreement report.
    pub disagreement_threshold: f64,
    /// Groups with fewer rows than this get no correlation matrix.
    pub min_group_size: usize,
    /// Explicit rater columns; `None` means infer from the header.
    pub rater_columns: Option<Vec<String>>,
    pub group_order: GroupOrder,
    pub scale: Option<RatingScale>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            disagreement_threshold: 1.0,
            min_group_size: 3,
            rater_columns: None,
            group_order: GroupOrder::FirstSeen,
            scale: None,
        }
    }
}
