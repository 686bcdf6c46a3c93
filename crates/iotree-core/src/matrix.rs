//! Validated square coefficient matrix.
//!
//! `matrix[i][j]` is the strength of sector `j`'s dependency on inputs from
//! sector `i` (sector `i` feeds sector `j`). The constructor enforces the
//! input contract — square shape, every entry finite and non-negative — so
//! downstream graph code can assume a well-formed matrix.

/// Errors raised while constructing a [`CoefficientMatrix`].
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// Backing data length does not match the declared `n × n` shape.
    #[error("matrix data has {got} entries, expected {expected} for n={n}")]
    WrongLength {
        /// Declared side length.
        n: usize,
        /// `n * n`.
        expected: usize,
        /// Actual entry count supplied.
        got: usize,
    },

    /// Row lengths differ, so the table is not square.
    #[error("row {row} has {got} entries, expected {expected}")]
    RaggedRow {
        /// Offending row index.
        row: usize,
        /// Expected row width.
        expected: usize,
        /// Actual row width.
        got: usize,
    },

    /// An entry was NaN or infinite.
    #[error("non-finite coefficient at ({row}, {col})")]
    NonFinite {
        /// Row index of the entry.
        row: usize,
        /// Column index of the entry.
        col: usize,
    },

    /// An entry was negative; input coefficients are output shares.
    #[error("negative coefficient {value} at ({row}, {col})")]
    Negative {
        /// Row index of the entry.
        row: usize,
        /// Column index of the entry.
        col: usize,
        /// The offending value.
        value: f32,
    },
}

/// An N×N matrix of input coefficients, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrix {
    n: usize,
    data: Vec<f32>,
}

impl CoefficientMatrix {
    /// Build a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] if the data length is not `n * n` or any
    /// entry is non-finite or negative.
    pub fn new(n: usize, data: Vec<f32>) -> Result<Self, MatrixError> {
        if data.len() != n * n {
            return Err(MatrixError::WrongLength {
                n,
                expected: n * n,
                got: data.len(),
            });
        }
        for (pos, &value) in data.iter().enumerate() {
            let (row, col) = (pos / n, pos % n);
            if !value.is_finite() {
                return Err(MatrixError::NonFinite { row, col });
            }
            if value < 0.0 {
                return Err(MatrixError::Negative { row, col, value });
            }
        }
        Ok(Self { n, data })
    }

    /// Build a matrix from a list of equal-length rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::RaggedRow`] if any row's length differs from
    /// the row count, plus everything [`CoefficientMatrix::new`] rejects.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, MatrixError> {
        let n = rows.len();
        for (row, r) in rows.iter().enumerate() {
            if r.len() != n {
                return Err(MatrixError::RaggedRow {
                    row,
                    expected: n,
                    got: r.len(),
                });
            }
        }
        Self::new(n, rows.into_iter().flatten().collect())
    }

    /// Coefficient at row `i`, column `j`: strength of `j`'s dependency on `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.n && j < self.n, "matrix index out of range");
        self.data[i * self.n + j]
    }

    /// Side length N.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_matrix_round_trips() {
        let m = CoefficientMatrix::new(2, vec![0.0, 0.1, 0.2, 0.3]).expect("build");
        assert_eq!(m.n(), 2);
        assert!((m.get(0, 1) - 0.1).abs() < f32::EPSILON);
        assert!((m.get(1, 0) - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn wrong_length_rejected() {
        let err = CoefficientMatrix::new(2, vec![0.0, 0.1, 0.2]).expect_err("3 != 4");
        assert!(matches!(
            err,
            MatrixError::WrongLength {
                n: 2,
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn nan_rejected() {
        let err =
            CoefficientMatrix::new(2, vec![0.0, f32::NAN, 0.2, 0.3]).expect_err("NaN rejected");
        assert!(matches!(err, MatrixError::NonFinite { row: 0, col: 1 }));
    }

    #[test]
    fn negative_rejected() {
        let err =
            CoefficientMatrix::new(2, vec![0.0, 0.1, -0.2, 0.3]).expect_err("negative rejected");
        assert!(matches!(err, MatrixError::Negative { row: 1, col: 0, .. }));
    }

    #[test]
    fn from_rows_checks_squareness() {
        let err = CoefficientMatrix::from_rows(vec![vec![0.0, 0.1], vec![0.2]])
            .expect_err("ragged row rejected");
        assert!(matches!(
            err,
            MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                got: 1
            }
        ));

        let m = CoefficientMatrix::from_rows(vec![vec![0.0, 0.1], vec![0.2, 0.3]]).expect("build");
        assert!((m.get(1, 1) - 0.3).abs() < f32::EPSILON);
    }
}
