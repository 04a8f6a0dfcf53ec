use crate::error::Result;
use crate::math::matrix::Matrix;

pub struct MaeCost;

impl MaeCost {
    /// Scalar MAE: mean(|actual - expected|).
    pub fn cost(expected: &Matrix, actual: &Matrix) -> Result<f64> {
        let diff = actual.sub(expected)?;
        let n = (diff.rows * diff.cols) as f64;
        let total: f64 = diff.data.iter().flatten().map(|x| x.abs()).sum();
        Ok(total / n)
    }

    /// Subgradient of the absolute error: `sign(actual - expected)`,
    /// with 0 at exact agreement.
    pub fn gradient(expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        Ok(actual.sub(expected)?.map(|x| {
            if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }
        }))
    }
}
