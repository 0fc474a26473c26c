use std::io::BufRead;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub mod csv;

use crate::model::config::AnalysisConfig;
use crate::model::table::{RatingRow, RatingTable};
use csv::{is_missing, open_maybe_gz, parse_numeric, split_record};

pub const FUNCTION_COLUMN: &str = "Function";
pub const CATEGORY_COLUMN: &str = "Category";
pub const SUBCATEGORY_COLUMN: &str = "Subcategory";

/// Numeric columns that are identifiers rather than scores and must never
/// be treated as raters, whether resolved explicitly or by inference.
pub const RATER_DENYLIST: &[&str] = &["id", "order"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("malformed input: required column {0:?} not found in header")]
    MissingColumn(String),
    #[error("fewer than 2 rater columns resolved (found {found}: {columns:?})")]
    MissingRaterColumns { found: usize, columns: Vec<String> },
    #[error("rater column {column:?} rejected: {reason}")]
    InvalidRaterColumn { column: String, reason: String },
    #[error("malformed input at line {line}, column {column:?}: {message}")]
    Malformed {
        line: usize,
        column: String,
        message: String,
    },
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaterSource {
    Explicit,
    Inferred,
}

#[derive(Debug, Clone)]
pub struct InputBundle {
    pub path: PathBuf,
    pub table: RatingTable,
    pub rater_source: RaterSource,
}

/// Loads a ratings CSV (optionally gzipped) and resolves the rater column
/// set. Explicit rater columns from the config win; otherwise raters are
/// inferred as the non-identifier, non-denylisted columns whose cells are
/// all numeric.
pub fn load_table(path: &Path, config: &AnalysisConfig) -> Result<InputBundle, InputError> {
    let reader = open_maybe_gz(path)?;
    let mut lines = reader.lines();

    let header_line = match lines.next() {
        Some(line) => line?,
        None => return Err(InputError::Parse("ratings file is empty".to_string())),
    };
    let header: Vec<String> = split_record(header_line.trim_end())
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();

    let function_idx = find_required(&header, FUNCTION_COLUMN)?;
    let category_idx = find_required(&header, CATEGORY_COLUMN)?;
    let subcategory_idx = find_required(&header, SUBCATEGORY_COLUMN)?;
    let identifier_idx = [function_idx, category_idx, subcategory_idx];

    let mut records: Vec<Vec<String>> = Vec::new();
    let mut line_no = 1usize;
    for line in lines {
        let line = line?;
        line_no += 1;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        let mut fields = split_record(trimmed);
        if fields.len() > header.len() {
            warn!(
                line = line_no,
                "record wider than header; extra fields ignored"
            );
            fields.truncate(header.len());
        } else if fields.len() < header.len() {
            warn!(
                line = line_no,
                "record narrower than header; padding with missing"
            );
            fields.resize(header.len(), String::new());
        }
        records.push(fields);
    }

    let (rater_idx, rater_source) = match &config.rater_columns {
        Some(names) => (
            resolve_explicit_raters(&header, &identifier_idx, names)?,
            RaterSource::Explicit,
        ),
        None => (
            infer_raters(&header, &identifier_idx, &records),
            RaterSource::Inferred,
        ),
    };

    if rater_idx.len() < 2 {
        return Err(InputError::MissingRaterColumns {
            found: rater_idx.len(),
            columns: rater_idx.iter().map(|&i| header[i].clone()).collect(),
        });
    }

    let raters: Vec<String> = rater_idx.iter().map(|&i| header[i].clone()).collect();
    info!("raters resolved ({rater_source:?}): {}", raters.join(", "));

    let mut rows = Vec::with_capacity(records.len());
    for (rec_no, fields) in records.iter().enumerate() {
        let line = rec_no + 2;
        let mut ratings = Vec::with_capacity(rater_idx.len());
        for &col in &rater_idx {
            let cell = &fields[col];
            if is_missing(cell) {
                ratings.push(None);
                continue;
            }
            let value = parse_numeric(cell).ok_or_else(|| InputError::Malformed {
                line,
                column: header[col].clone(),
                message: format!("non-numeric rating {cell:?}"),
            })?;
            if let Some(scale) = &config.scale
                && !scale.contains(value)
            {
                return Err(InputError::Malformed {
                    line,
                    column: header[col].clone(),
                    message: format!(
                        "rating {value} outside configured scale {}..{}",
                        scale.min, scale.max
                    ),
                });
            }
            ratings.push(Some(value));
        }
        rows.push(RatingRow {
            function: fields[function_idx].trim().to_string(),
            category: fields[category_idx].trim().to_string(),
            subcategory: fields[subcategory_idx].trim().to_string(),
            ratings,
        });
    }

    Ok(InputBundle {
        path: path.to_path_buf(),
        table: RatingTable { raters, rows },
        rater_source,
    })
}

fn find_required(header: &[String], name: &str) -> Result<usize, InputError> {
    header
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| InputError::MissingColumn(name.to_string()))
}

fn is_denylisted(name: &str) -> bool {
    RATER_DENYLIST.iter().any(|d| name.eq_ignore_ascii_case(d))
}

/// Explicit columns are a contract: names must exist, must not collide with
/// identifier or denylisted columns, and their cells are validated during
/// row building with line/column context.
fn resolve_explicit_raters(
    header: &[String],
    identifier_idx: &[usize; 3],
    names: &[String],
) -> Result<Vec<usize>, InputError> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let idx = header.iter().position(|h| h == name).ok_or_else(|| {
            InputError::InvalidRaterColumn {
                column: name.clone(),
                reason: "not present in header".to_string(),
            }
        })?;
        if identifier_idx.contains(&idx) {
            return Err(InputError::InvalidRaterColumn {
                column: name.clone(),
                reason: "is a required identifier column".to_string(),
            });
        }
        if is_denylisted(name) {
            return Err(InputError::InvalidRaterColumn {
                column: name.clone(),
                reason: "is on the non-rating denylist".to_string(),
            });
        }
        if resolved.contains(&idx) {
            return Err(InputError::InvalidRaterColumn {
                column: name.clone(),
                reason: "listed more than once".to_string(),
            });
        }
        resolved.push(idx);
    }
    Ok(resolved)
}

/// Inference convention: every column that is not an identifier, not
/// denylisted, and whose non-missing cells all parse as numbers is a rater.
/// A column disqualified by a stray non-numeric cell is dropped with a
/// warning rather than failing the load.
fn infer_raters(
    header: &[String],
    identifier_idx: &[usize; 3],
    records: &[Vec<String>],
) -> Vec<usize> {
    let mut raters = Vec::new();
    for (idx, name) in header.iter().enumerate() {
        if identifier_idx.contains(&idx) {
            continue;
        }
        if is_denylisted(name) {
            info!("column {name:?} excluded from raters (denylist)");
            continue;
        }
        let numeric = records
            .iter()
            .all(|rec| is_missing(&rec[idx]) || parse_numeric(&rec[idx]).is_some());
        if numeric {
            raters.push(idx);
        } else {
            warn!("column {name:?} excluded from raters (non-numeric values)");
        }
    }
    raters
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
