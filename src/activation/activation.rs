use serde::{Deserialize, Serialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

/// A pluggable unary activation: a scalar-to-scalar map plus its derivative.
///
/// The network engine never inspects which variant is in use; it only calls
/// `function` / `derivative` (or the matrix-valued helpers below, which map
/// them over every element).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    ReLU,
    LeakyReLU { alpha: f64 },
    Sigmoid,
    Tanh,
}

impl ActivationFunction {
    /// Element-wise activation.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU { alpha } => {
                if x > 0.0 {
                    x
                } else {
                    alpha * x
                }
            }
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Element-wise derivative of the activation.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU { alpha } => {
                if x > 0.0 {
                    1.0
                } else {
                    *alpha
                }
            }
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }

    /// Applies the activation to every element of a matrix.
    pub fn apply(&self, m: &Matrix) -> Matrix {
        m.map(|x| self.function(x))
    }

    /// Applies the activation derivative to every element of a matrix.
    pub fn apply_derivative(&self, m: &Matrix) -> Matrix {
        m.map(|x| self.derivative(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_clamps_negatives() {
        let relu = ActivationFunction::ReLU;
        assert_eq!(relu.function(3.5), 3.5);
        assert_eq!(relu.function(-3.5), 0.0);
        assert_eq!(relu.derivative(3.5), 1.0);
        assert_eq!(relu.derivative(-3.5), 0.0);
    }

    #[test]
    fn leaky_relu_keeps_a_negative_slope() {
        let leaky = ActivationFunction::LeakyReLU { alpha: 0.01 };
        assert!((leaky.function(-2.0) - -0.02).abs() < 1e-12);
        assert_eq!(leaky.derivative(-2.0), 0.01);
        assert_eq!(leaky.derivative(2.0), 1.0);
    }

    #[test]
    fn sigmoid_is_centered_at_one_half() {
        let sigmoid = ActivationFunction::Sigmoid;
        assert!((sigmoid.function(0.0) - 0.5).abs() < 1e-12);
        assert!((sigmoid.derivative(0.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn tanh_derivative_matches_identity() {
        let tanh = ActivationFunction::Tanh;
        let x: f64 = 0.7;
        let expected = 1.0 - x.tanh() * x.tanh();
        assert!((tanh.derivative(x) - expected).abs() < 1e-12);
    }

    #[test]
    fn apply_maps_over_every_element() {
        let m = Matrix::from_data(vec![vec![-1.0, 2.0], vec![3.0, -4.0]]);
        let expected = Matrix::from_data(vec![vec![0.0, 2.0], vec![3.0, 0.0]]);
        assert_eq!(ActivationFunction::ReLU.apply(&m), expected);
    }
}
