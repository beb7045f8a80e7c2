use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Course relationship file '{file}' not found in any of: {}", format_candidates(.candidates))]
    MissingPrimaryData {
        file: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Missing column(s) {columns:?} in {path}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub fn is_missing_primary_data(&self) -> bool {
        matches!(self, LoadError::MissingPrimaryData { .. })
    }
}

/// Reason a single merit file was discarded.
#[derive(Error, Debug)]
pub enum MeritFileError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s) {0:?}")]
    MissingColumns(Vec<String>),

    #[error("file name does not follow the {{cycle}}{{unit}}.csv pattern")]
    UnrecognizedName,
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
