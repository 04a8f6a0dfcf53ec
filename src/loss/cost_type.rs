use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loss::mae::MaeCost;
use crate::loss::mse::MseCost;
use crate::math::matrix::Matrix;

/// Selects the cost-derivative plugged into the training loop.
///
/// Whatever the variant, the contract is the same two-matrix reduction:
/// `gradient(expected, actual)` returns ∂cost/∂output with the shape of the
/// output. The engine never cares which cost is behind it.
///
/// - `Mse` — squared error; the default pairing for regression outputs.
/// - `Mae` — absolute error; less sensitive to outliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    Mse,
    Mae,
}

impl CostFunction {
    /// Scalar cost for one example — dispatches on the variant.
    pub fn cost(&self, expected: &Matrix, actual: &Matrix) -> Result<f64> {
        match self {
            CostFunction::Mse => MseCost::cost(expected, actual),
            CostFunction::Mae => MaeCost::cost(expected, actual),
        }
    }

    /// Gradient of the cost w.r.t. the actual output — dispatches on the variant.
    pub fn gradient(&self, expected: &Matrix, actual: &Matrix) -> Result<Matrix> {
        match self {
            CostFunction::Mse => MseCost::gradient(expected, actual),
            CostFunction::Mae => MaeCost::gradient(expected, actual),
        }
    }
}
