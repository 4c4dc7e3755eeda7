//! Symptom dataset model
//!
//! One row per recorded case, one binary indicator per column. Loaded once at
//! startup and shared read-only afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no header row")]
    MissingHeader,

    #[error("dataset has no usable columns after exclusion")]
    NoColumns,

    #[error("duplicate column '{0}' in header")]
    DuplicateColumn(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: column '{column}' has non-binary value '{value}'")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("dataset has no data rows")]
    Empty,

    #[error("column '{0}' not present in dataset")]
    MissingColumn(String),
}

/// One recorded case. Values are indexed by the owning dataset's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomRecord {
    values: Vec<bool>,
}

impl SymptomRecord {
    pub fn is_present(&self, index: usize) -> bool {
        self.values.get(index).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<SymptomRecord>,
}

impl Dataset {
    /// Load a comma-separated dataset from disk, dropping `excluded` columns.
    pub fn load(path: impl AsRef<Path>, excluded: &[String]) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::parse(&text, excluded)?;
        tracing::info!(
            path = %path.display(),
            columns = dataset.columns.len(),
            records = dataset.records.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse dataset text. The first record is the header; quoted fields
    /// follow RFC 4180 and blank lines are skipped.
    pub fn parse(text: &str, excluded: &[String]) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let header = reader.headers()?.clone();
        if header.is_empty() {
            return Err(DatasetError::MissingHeader);
        }

        for name in excluded {
            if !header.iter().any(|h| h == name) {
                tracing::warn!("Excluded column '{}' not found in dataset header", name);
            }
        }

        // (position in the raw row, column name) for every kept column
        let kept: Vec<(usize, &str)> = header
            .iter()
            .enumerate()
            .filter(|(_, name)| !excluded.iter().any(|e| e == name))
            .collect();

        if kept.is_empty() {
            return Err(DatasetError::NoColumns);
        }

        let mut seen = HashSet::new();
        for (_, name) in &kept {
            if !seen.insert(*name) {
                return Err(DatasetError::DuplicateColumn(name.to_string()));
            }
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line() as usize);
            if row.len() != header.len() {
                return Err(DatasetError::RowLength {
                    line,
                    expected: header.len(),
                    found: row.len(),
                });
            }

            let values = kept
                .iter()
                .map(|(pos, name)| {
                    let raw = &row[*pos];
                    parse_indicator(raw).ok_or_else(|| DatasetError::InvalidValue {
                        line,
                        column: name.to_string(),
                        value: raw.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            records.push(SymptomRecord { values });
        }

        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self {
            columns: kept.into_iter().map(|(_, name)| name.to_string()).collect(),
            records,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[SymptomRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows where `column` is set, `None` if the column is unknown.
    pub fn count_present(&self, column: &str) -> Option<u64> {
        let index = self.column_index(column)?;
        Some(
            self.records
                .iter()
                .filter(|r| r.is_present(index))
                .count() as u64,
        )
    }
}

fn parse_indicator(raw: &str) -> Option<bool> {
    match raw {
        "1" | "1.0" => Some(true),
        "0" | "0.0" => Some(false),
        other if other.eq_ignore_ascii_case("true") => Some(true),
        other if other.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
