//! e-stat input coefficient table ingestion.
//!
//! Parses the regional input coefficient table CSV as downloaded from
//! <https://www.e-stat.go.jp>: Shift-JIS encoded, with a fixed header and
//! column layout.
//!
//! # Table layout
//!
//! ```text
//! col 1          row type (must be 投入係数 on every data row)
//! col 2          sector code
//! col 3          sector code name
//! cols 5..len-1  coefficient values (last column is the row average)
//!
//! row 0          sector codes for the data columns
//! row 1          sector code names for the data columns
//! rows 2..       data rows
//! ```
//!
//! Data rows whose code appears in the header code list must appear in
//! header order and become matrix rows. Remaining rows (totals, value
//! added, …) are "special rows": captured by code name, excluded from the
//! matrix.
//!
//! Export options that add annotation rows change the column count
//! mid-table; that surfaces as [`TableError::RaggedTable`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::{debug, instrument};

use crate::matrix::{CoefficientMatrix, MatrixError};

/// Row type marker on every coefficient data row ("input coefficient").
const COEFFICIENT_ROW_TYPE: &str = "投入係数";

const COL_TYPE: usize = 1;
const COL_CODE: usize = 2;
const COL_CODE_NAME: usize = 3;
const COL_DATA_START: usize = 5;

const ROW_CODE: usize = 0;
const ROW_CODE_NAME: usize = 1;
const ROW_DATA_START: usize = 2;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while ingesting an e-stat coefficient table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Failed to read the table file.
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level parse failure.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The byte stream was not valid Shift-JIS.
    #[error("table is not valid Shift-JIS")]
    BadEncoding,

    /// The table contained no rows at all.
    #[error("table is empty")]
    EmptyTable,

    /// Row width differs from the header row width.
    ///
    /// Usually means the export included annotation options.
    #[error("unexpected table dimensions: row {row} has {got} columns, expected {expected}")]
    RaggedTable {
        /// Offending row number (0-based).
        row: usize,
        /// Header row width.
        expected: usize,
        /// Actual width of the offending row.
        got: usize,
    },

    /// The table is too narrow to contain any data columns.
    #[error("unexpected table layout: only {width} columns")]
    UnexpectedLayout {
        /// Total column count.
        width: usize,
    },

    /// A data row carried a row type other than 投入係数.
    #[error("unexpected row type at row {row}: {found}")]
    UnexpectedRowType {
        /// Offending row number (0-based).
        row: usize,
        /// The row type value found.
        found: String,
    },

    /// A coefficient row's code did not match the header code order.
    #[error("inconsistent code ordering at row {row}: expected {expected}, found {found}")]
    InconsistentOrdering {
        /// Offending row number (0-based).
        row: usize,
        /// Code expected next per the header.
        expected: String,
        /// Code actually found.
        found: String,
    },

    /// A coefficient cell failed to parse as a float.
    #[error("bad coefficient at row {row}, column {col}: {value:?}")]
    BadCoefficient {
        /// Offending row number (0-based).
        row: usize,
        /// Offending column number (0-based).
        col: usize,
        /// The unparseable cell contents.
        value: String,
    },

    /// Coefficient rows and header codes disagree in count.
    #[error("coefficient matrix not square: {rows} verified rows for {cols} codes")]
    NotSquare {
        /// Number of verified coefficient rows.
        rows: usize,
        /// Number of header codes (matrix columns).
        cols: usize,
    },

    /// Matrix-level validation failed (non-finite or negative entries).
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

// ---------------------------------------------------------------------------
// InputTable
// ---------------------------------------------------------------------------

/// A parsed and validated input coefficient table.
#[derive(Debug, Clone)]
pub struct InputTable {
    /// Sector code names in header code order; one per matrix row/column.
    pub labels: Vec<String>,
    /// The validated square coefficient matrix.
    pub matrix: CoefficientMatrix,
    /// Non-sector rows (totals, value added, …) keyed by code name.
    pub special_rows: BTreeMap<String, Vec<f32>>,
}

impl InputTable {
    /// Read and parse a Shift-JIS table file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on I/O failure or any parse/validation error.
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let bytes = std::fs::read(path)?;
        Self::from_shift_jis(&bytes)
    }

    /// Decode Shift-JIS bytes and parse the table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::BadEncoding`] if the bytes are not valid
    /// Shift-JIS, otherwise any parse/validation error.
    pub fn from_shift_jis(bytes: &[u8]) -> Result<Self, TableError> {
        let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
        if had_errors {
            return Err(TableError::BadEncoding);
        }
        Self::parse(&text)
    }

    /// Parse an already-decoded table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] on any structural or numeric violation.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let rows = read_rows(text)?;
        let first = rows.first().ok_or(TableError::EmptyTable)?;
        let width = first.len();

        for (row, r) in rows.iter().enumerate().skip(1) {
            if r.len() != width {
                return Err(TableError::RaggedTable {
                    row,
                    expected: width,
                    got: r.len(),
                });
            }
        }

        // Need at least one data column before the trailing average column.
        if width < COL_DATA_START + 2 {
            return Err(TableError::UnexpectedLayout { width });
        }
        let data_end = width - 1; // exclusive; last column is the row average

        let codes: Vec<String> = rows[ROW_CODE][COL_DATA_START..data_end].to_vec();
        let names = rows
            .get(ROW_CODE_NAME)
            .map(|r| &r[COL_DATA_START..data_end])
            .unwrap_or_default();
        let code_to_name: HashMap<&str, &str> = codes
            .iter()
            .map(String::as_str)
            .zip(names.iter().map(String::as_str))
            .collect();

        let mut verified: Vec<Vec<f32>> = Vec::with_capacity(codes.len());
        let mut special_rows: BTreeMap<String, Vec<f32>> = BTreeMap::new();
        let mut next_code = 0usize;

        for (row_ix, row) in rows.iter().enumerate().skip(ROW_DATA_START) {
            if row[COL_TYPE] != COEFFICIENT_ROW_TYPE {
                return Err(TableError::UnexpectedRowType {
                    row: row_ix,
                    found: row[COL_TYPE].clone(),
                });
            }

            let values = parse_coefficients(row, row_ix, COL_DATA_START, data_end)?;
            let code = &row[COL_CODE];

            if code_to_name.contains_key(code.as_str()) {
                let expected = codes.get(next_code).cloned().unwrap_or_default();
                if *code != expected {
                    return Err(TableError::InconsistentOrdering {
                        row: row_ix,
                        expected,
                        found: code.clone(),
                    });
                }
                next_code += 1;
                verified.push(values);
            } else {
                special_rows.insert(row[COL_CODE_NAME].clone(), values);
            }
        }

        if verified.len() != codes.len() {
            return Err(TableError::NotSquare {
                rows: verified.len(),
                cols: codes.len(),
            });
        }

        let matrix = CoefficientMatrix::from_rows(verified)?;
        let labels: Vec<String> = codes
            .iter()
            .map(|code| {
                code_to_name
                    .get(code.as_str())
                    .map_or_else(|| code.clone(), |name| (*name).to_string())
            })
            .collect();

        debug!(
            sectors = labels.len(),
            special = special_rows.len(),
            "parsed input coefficient table"
        );

        Ok(Self {
            labels,
            matrix,
            special_rows,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn read_rows(text: &str) -> Result<Vec<Vec<String>>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn parse_coefficients(
    row: &[String],
    row_ix: usize,
    start: usize,
    end: usize,
) -> Result<Vec<f32>, TableError> {
    row[start..end]
        .iter()
        .enumerate()
        .map(|(offset, cell)| {
            cell.trim()
                .parse::<f32>()
                .map_err(|_| TableError::BadCoefficient {
                    row: row_ix,
                    col: start + offset,
                    value: cell.clone(),
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
