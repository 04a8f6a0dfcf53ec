use crate::error::Result;
use crate::math::matrix::Matrix;

pub struct MseCost;

impl MseCost {
    /// Scalar MSE: mean((actual - expected)²). Used for monitoring only;
    /// training consumes the gradient below.
    pub fn cost(expected: &Matrix, actual: &Matrix) -> Result<f64> {
        let diff = actual.sub(expected)?;
        let n = (diff.rows * diff.cols) as f64;
        let total: f64 = diff.data.iter().flatten().map(|x| x * x).sum();
        Ok(total / n)
    }

    /// Gradient of the squared error w.r.t. the actual output:
    /// `2 · (actual - expected)`.
    pub fn gradient(expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        Ok(actual.sub(expected)?.scale(2.0))
    }
}
