use serde::Serialize;

use crate::pipeline::AnalysisOutput;
use crate::pipeline::correlation::CorrelationMatrix;
use crate::report::ReportMeta;

/// `summary.json` document. Non-finite correlations serialize as `null`,
/// so degenerate pairs stay visible without breaking consumers.
#[derive(Debug, Serialize)]
pub struct SummaryDoc {
    pub tool: ToolDoc,
    pub input: InputDoc,
    pub config: ConfigDoc,
    pub high_disagreement: HighDisagreementDoc,
    pub global: GlobalDoc,
    pub functions: Vec<FunctionDoc>,
}

#[derive(Debug, Serialize)]
pub struct ToolDoc {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct InputDoc {
    pub path: String,
    pub n_rows: usize,
    pub raters: Vec<String>,
    pub rater_source: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigDoc {
    pub disagreement_threshold: f64,
    pub min_group_size: usize,
    pub group_order: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct HighDisagreementDoc {
    pub threshold: f64,
    pub count: usize,
    pub items: Vec<DisagreementItemDoc>,
}

#[derive(Debug, Serialize)]
pub struct DisagreementItemDoc {
    pub function: String,
    pub category: String,
    pub subcategory: String,
    pub std_dev: f64,
}

#[derive(Debug, Serialize)]
pub struct GlobalDoc {
    pub insufficient_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<MatrixDoc>,
    pub mean_offdiag: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatrixDoc {
    pub raters: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct FunctionDoc {
    pub function: String,
    pub categories: Vec<GroupDoc>,
}

#[derive(Debug, Serialize)]
pub struct GroupDoc {
    pub category: String,
    pub row_count: usize,
    pub insufficient_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<MatrixDoc>,
    pub mean_offdiag: Option<f64>,
}

pub fn build_summary(meta: &ReportMeta, output: &AnalysisOutput) -> SummaryDoc {
    SummaryDoc {
        tool: ToolDoc {
            name: meta.tool_name.clone(),
            version: meta.tool_version.clone(),
        },
        input: InputDoc {
            path: meta.input_path.clone(),
            n_rows: meta.n_rows,
            raters: meta.raters.clone(),
            rater_source: meta.rater_source.clone(),
        },
        config: ConfigDoc {
            disagreement_threshold: meta.disagreement_threshold,
            min_group_size: meta.min_group_size,
            group_order: meta.group_order.clone(),
            scale: meta.scale.map(|(min, max)| [min, max]),
        },
        high_disagreement: HighDisagreementDoc {
            threshold: output.high_disagreement.threshold,
            count: output.high_disagreement.items.len(),
            items: output
                .high_disagreement
                .items
                .iter()
                .map(|i| DisagreementItemDoc {
                    function: i.function.clone(),
                    category: i.category.clone(),
                    subcategory: i.subcategory.clone(),
                    std_dev: i.std_dev,
                })
                .collect(),
        },
        global: GlobalDoc {
            insufficient_data: output.global_insufficient,
            correlation: output.global.as_ref().map(matrix_doc),
            mean_offdiag: finite_or_none(output.global_mean_offdiag),
        },
        functions: output
            .functions
            .iter()
            .map(|f| FunctionDoc {
                function: f.function.clone(),
                categories: f
                    .categories
                    .iter()
                    .map(|g| GroupDoc {
                        category: g.category.clone(),
                        row_count: g.row_count,
                        insufficient_data: g.insufficient_data,
                        correlation: g.correlation.as_ref().map(matrix_doc),
                        mean_offdiag: finite_or_none(g.mean_offdiag),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn render_summary_json(doc: &SummaryDoc) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

fn matrix_doc(matrix: &CorrelationMatrix) -> MatrixDoc {
    MatrixDoc {
        raters: matrix.raters.clone(),
        values: matrix.values.clone(),
    }
}

fn finite_or_none(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}
