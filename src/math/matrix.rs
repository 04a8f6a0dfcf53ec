use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{NetError, Result};

/// Default tolerance used by `PartialEq`; see [`Matrix::approx_eq`].
pub const EPSILON: f64 = 1e-6;

/// A dense 2-D matrix of `f64` values.
///
/// Every operation is pure: the receiver is never mutated, a fresh matrix is
/// returned instead. Shape-checked operations (`add`, `sub`, `hadamard`,
/// `dot`) return `NetError::ShapeMismatch` on incompatible operands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row-major data.
    ///
    /// # Panics
    /// Panics if `data` is empty or its rows have unequal lengths.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        assert!(!data.is_empty(), "matrix must have at least one row");
        let cols = data[0].len();
        assert!(
            data.iter().all(|row| row.len() == cols),
            "all rows must have equal length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    /// Convenience constructor for an n×1 column vector.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::from_data(values.iter().map(|&v| vec![v]).collect())
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Gaussian-initialized matrix: every element drawn independently from
    /// N(0, std_dev²) using the thread-local RNG.
    pub fn gaussian(rows: usize, cols: usize, std_dev: f64) -> Matrix {
        Matrix::gaussian_with(&mut rand::thread_rng(), rows, cols, std_dev)
    }

    /// Like [`Matrix::gaussian`], but sampling from a caller-supplied RNG so
    /// that initialization is reproducible under a fixed seed.
    pub fn gaussian_with<R: Rng>(rng: &mut R, rows: usize, cols: usize, std_dev: f64) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// Elementwise sum. Fails unless both operands share a shape.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    /// Elementwise difference. Fails unless both operands share a shape.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product. Fails unless both operands share a shape.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "hadamard", |a, b| a * b)
    }

    /// Scales every element by `scalar`.
    pub fn scale(&self, scalar: f64) -> Matrix {
        self.map(|x| x * scalar)
    }

    /// Standard matrix product. Requires `self.cols == other.rows`; the
    /// result has shape `(self.rows, other.cols)`.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(NetError::ShapeMismatch {
                op: "dot",
                lhs: (self.rows, self.cols),
                rhs: (other.rows, other.cols),
            });
        }

        let mut res = Matrix::zeros(self.rows, other.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * other.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Applies a unary scalar function independently to every element.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        )
    }

    /// True iff both matrices share a shape and every pair of corresponding
    /// elements differs by at most `epsilon`.
    ///
    /// Floating-point drift accumulates over repeated training arithmetic,
    /// so equality is approximate; exact comparison is almost never what a
    /// caller wants here.
    pub fn approx_eq(&self, other: &Matrix, epsilon: f64) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        self.data.iter().zip(other.data.iter()).all(|(ra, rb)| {
            ra.iter().zip(rb.iter()).all(|(a, b)| (a - b).abs() <= epsilon)
        })
    }

    /// Element access.
    ///
    /// # Panics
    /// Panics if `row` or `col` is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Shape as `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn zip_with<F>(&self, other: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(NetError::ShapeMismatch {
                op,
                lhs: (self.rows, self.cols),
                rhs: (other.rows, other.cols),
            });
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = f(self.data[i][j], other.data[i][j]);
            }
        }

        Ok(res)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, EPSILON)
    }
}
