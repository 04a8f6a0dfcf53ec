use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::net_config::NetConfig;
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// A feed-forward neural network trained by online backpropagation.
///
/// `weights[i]` has shape `(nodes[i+1], nodes[i])` and `biases[i]` has shape
/// `(nodes[i+1], 1)`, one pair per layer transition. Both are allocated once
/// at construction and never resized; training mutates them in place, one
/// example at a time.
///
/// Layer values produced by the forward pass are *pre-activation* sums. The
/// activation for layer index `k` is applied lazily wherever that layer's
/// value is consumed: feeding it forward, differentiating it during the
/// backward pass, or reading the network output.
#[derive(Debug, Clone)]
pub struct FeedForwardNetwork {
    pub topology: Vec<usize>,
    pub weights: Vec<Matrix>,
    pub biases: Vec<Matrix>,
    pub config: NetConfig,
}

impl FeedForwardNetwork {
    /// Builds a network with Gaussian-initialized weights and zero biases.
    ///
    /// Each `weights[i]` is filled with independent samples from
    /// N(0, 1/nodes[i]) — variance scaled by the fan-in so activation
    /// magnitudes stay stable across depth.
    pub fn new(topology: &[usize], config: NetConfig) -> Result<Self> {
        Self::from_rng(topology, config, &mut rand::thread_rng())
    }

    /// Like [`FeedForwardNetwork::new`], but seeded: two networks built from
    /// the same topology, config and seed start with identical weights.
    pub fn new_seeded(topology: &[usize], config: NetConfig, seed: u64) -> Result<Self> {
        Self::from_rng(topology, config, &mut StdRng::seed_from_u64(seed))
    }

    pub(crate) fn from_rng<R: Rng>(topology: &[usize], config: NetConfig, rng: &mut R) -> Result<Self> {
        validate_topology(topology)?;
        config.validate(topology.len())?;

        let mut weights = Vec::with_capacity(topology.len() - 1);
        let mut biases = Vec::with_capacity(topology.len() - 1);

        for pair in topology.windows(2) {
            let (cur, next) = (pair[0], pair[1]);
            let std_dev = (1.0 / cur as f64).sqrt();
            weights.push(Matrix::gaussian_with(rng, next, cur, std_dev));
            biases.push(Matrix::zeros(next, 1));
        }

        Ok(FeedForwardNetwork {
            topology: topology.to_vec(),
            weights,
            biases,
            config,
        })
    }

    /// Number of layer transitions (= layer count − 1).
    pub fn transitions(&self) -> usize {
        self.weights.len()
    }

    /// Forward pass: the ordered pre-activation layer values.
    ///
    /// `layers[0]` is the raw input;
    /// `layers[i+1] = weights[i] · act_i(layers[i]) + biases[i]`.
    pub fn layer_values(&self, input: &Matrix) -> Result<Vec<Matrix>> {
        let mut layers = Vec::with_capacity(self.weights.len() + 1);
        layers.push(input.clone());

        for i in 0..self.weights.len() {
            let activated = self.config.activation(i).apply(&layers[i]);
            let next = self.weights[i].dot(&activated)?.add(&self.biases[i])?;
            layers.push(next);
        }

        Ok(layers)
    }

    /// Runs inference: the final layer value with its activation applied.
    pub fn output(&self, input: &Matrix) -> Result<Matrix> {
        let layers = self.layer_values(input)?;
        let last = layers.len() - 1;
        Ok(self.config.activation(last).apply(&layers[last]))
    }

    /// Backward pass: one error delta per layer transition, computed
    /// last-to-first by the chain rule.
    ///
    /// The output delta injects the cost gradient:
    /// `delta[L-1] = costGrad(expected, act_L(layers[L])) ⊙ act_L'(layers[L])`;
    /// every earlier delta propagates through the following transition's
    /// weights: `delta[i] = (weights[i+1]ᵗ · delta[i+1]) ⊙ act_{i+1}'(layers[i+1])`.
    pub fn deltas(&self, expected: &Matrix, layers: &[Matrix]) -> Result<Vec<Matrix>> {
        let transitions = self.weights.len();
        let last = transitions;
        let out_act = self.config.activation(last);

        let output_delta = self
            .config
            .cost
            .gradient(expected, &out_act.apply(&layers[last]))?
            .hadamard(&out_act.apply_derivative(&layers[last]))?;

        // Built back-to-front, then reversed into transition order.
        let mut reversed = vec![output_delta];
        for i in (0..transitions - 1).rev() {
            let act = self.config.activation(i + 1);
            let propagated = self.weights[i + 1]
                .transpose()
                .dot(&reversed[reversed.len() - 1])?
                .hadamard(&act.apply_derivative(&layers[i + 1]))?;
            reversed.push(propagated);
        }

        reversed.reverse();
        Ok(reversed)
    }

    /// Applies one gradient-descent step:
    /// `weights[i] -= η · (delta[i] · act_i(layers[i])ᵗ)` and
    /// `biases[i] -= η · delta[i]`.
    ///
    /// `deltas` may be shorter than the transition count, in which case only
    /// the leading transitions are updated. Backpropagation-through-time
    /// relies on this: before the final timestep there is no output-layer
    /// error, so the output transition receives no update.
    pub fn update(&mut self, deltas: &[Matrix], layers: &[Matrix]) -> Result<()> {
        let lr = self.config.learning_rate;

        for (i, delta) in deltas.iter().enumerate() {
            let activated = self.config.activation(i).apply(&layers[i]);
            let weight_grad = delta.dot(&activated.transpose())?.scale(lr);
            self.weights[i] = self.weights[i].sub(&weight_grad)?;
            self.biases[i] = self.biases[i].sub(&delta.scale(lr))?;
        }

        Ok(())
    }

    /// Trains on `(inputs[k], outputs[k])` pairs, in order, for the
    /// configured number of iterations. Each example gets a full
    /// forward pass → delta computation → weight update cycle.
    ///
    /// Fails with `InputSizeMismatch` before touching any weight if the two
    /// sets disagree in length. Returns the mean cost over the final
    /// iteration.
    pub fn train(&mut self, inputs: &[Matrix], outputs: &[Matrix]) -> Result<f64> {
        if inputs.len() != outputs.len() {
            return Err(NetError::InputSizeMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }

        let mut mean_cost = 0.0;

        for _ in 0..self.config.iterations {
            let mut total = 0.0;

            for (input, expected) in inputs.iter().zip(outputs.iter()) {
                let layers = self.layer_values(input)?;
                let last = layers.len() - 1;
                let actual = self.config.activation(last).apply(&layers[last]);
                total += self.config.cost.cost(expected, &actual)?;

                let deltas = self.deltas(expected, &layers)?;
                self.update(&deltas, &layers)?;
            }

            mean_cost = if inputs.is_empty() {
                0.0
            } else {
                total / inputs.len() as f64
            };
        }

        Ok(mean_cost)
    }

    /// Mean cost over a dataset without updating any weight.
    pub fn evaluate(&self, inputs: &[Matrix], outputs: &[Matrix]) -> Result<f64> {
        if inputs.len() != outputs.len() {
            return Err(NetError::InputSizeMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if inputs.is_empty() {
            return Ok(0.0);
        }

        let mut total = 0.0;
        for (input, expected) in inputs.iter().zip(outputs.iter()) {
            let actual = self.output(input)?;
            total += self.config.cost.cost(expected, &actual)?;
        }

        Ok(total / inputs.len() as f64)
    }
}

pub(crate) fn validate_topology(topology: &[usize]) -> Result<()> {
    if topology.len() < 2 {
        return Err(NetError::InvalidTopology(format!(
            "need at least an input and an output layer, got {} layer(s)",
            topology.len()
        )));
    }
    if let Some(pos) = topology.iter().position(|&nodes| nodes == 0) {
        return Err(NetError::InvalidTopology(format!(
            "layer {pos} has zero nodes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::loss::cost_type::CostFunction;

    /// The {2, 3, 2} fixture: ReLU hidden, identity output, fixed weights
    /// W0 = [[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]], W1 = W0ᵗ, zero biases.
    fn fixture() -> FeedForwardNetwork {
        let config = NetConfig::new(1, 0.1, ActivationFunction::ReLU, CostFunction::Mse)
            .with_activation(2, ActivationFunction::Identity);
        let mut net = FeedForwardNetwork::new_seeded(&[2, 3, 2], config, 1).unwrap();

        let w0 = Matrix::from_data(vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]]);
        net.weights[1] = w0.transpose();
        net.weights[0] = w0;
        net.biases[0] = Matrix::zeros(3, 1);
        net.biases[1] = Matrix::zeros(2, 1);
        net
    }

    #[test]
    fn construction_shapes_follow_the_topology() {
        let config = NetConfig::new(1, 0.1, ActivationFunction::Sigmoid, CostFunction::Mse);
        let net = FeedForwardNetwork::new(&[4, 7, 3], config).unwrap();

        assert_eq!(net.transitions(), 2);
        assert_eq!(net.weights[0].size(), (7, 4));
        assert_eq!(net.weights[1].size(), (3, 7));
        assert_eq!(net.biases[0].size(), (7, 1));
        assert_eq!(net.biases[1].size(), (3, 1));
    }

    #[test]
    fn biases_start_at_zero() {
        let config = NetConfig::new(1, 0.1, ActivationFunction::Sigmoid, CostFunction::Mse);
        let net = FeedForwardNetwork::new(&[1, 10], config).unwrap();
        assert_eq!(net.biases[0], Matrix::zeros(10, 1));
    }

    #[test]
    fn rejects_bad_topologies() {
        let config = NetConfig::new(1, 0.1, ActivationFunction::Sigmoid, CostFunction::Mse);
        assert!(FeedForwardNetwork::new(&[3], config.clone()).is_err());
        assert!(FeedForwardNetwork::new(&[], config.clone()).is_err());
        assert!(FeedForwardNetwork::new(&[3, 0, 2], config).is_err());
    }

    #[test]
    fn weight_init_matches_the_fan_in_scaled_gaussian() {
        let config = NetConfig::new(1, 0.1, ActivationFunction::Sigmoid, CostFunction::Mse);
        let net = FeedForwardNetwork::new_seeded(&[50, 40], config, 7).unwrap();
        let w = &net.weights[0];

        let n = (w.rows * w.cols) as f64;
        let mean: f64 = w.data.iter().flatten().sum::<f64>() / n;
        let var: f64 = w.data.iter().flatten().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;

        // 2000 samples; generous statistical tolerances.
        assert!(mean.abs() < 0.02, "empirical mean {mean} too far from 0");
        assert!((var - 1.0 / 50.0).abs() < 0.01, "empirical variance {var} too far from 1/50");
    }

    #[test]
    fn seeded_construction_is_deterministic() {
        let config = NetConfig::new(1, 0.1, ActivationFunction::Sigmoid, CostFunction::Mse);
        let a = FeedForwardNetwork::new_seeded(&[3, 5, 2], config.clone(), 42).unwrap();
        let b = FeedForwardNetwork::new_seeded(&[3, 5, 2], config, 42).unwrap();
        for (wa, wb) in a.weights.iter().zip(b.weights.iter()) {
            assert!(wa.approx_eq(wb, 0.0));
        }
    }

    #[test]
    fn hidden_layer_holds_the_pre_activation_sum() {
        let net = fixture();
        let input = Matrix::column(&[1.0, 1.0]);

        let layers = net.layer_values(&input).unwrap();

        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], input);
        assert_eq!(layers[1], Matrix::column(&[0.3, 0.7, 1.1]));
    }

    #[test]
    fn output_applies_the_final_activation() {
        let net = fixture();
        let input = Matrix::column(&[1.0, 1.0]);

        let output = net.output(&input).unwrap();

        assert_eq!(output, Matrix::column(&[0.79, 1.0]));
    }

    #[test]
    fn deltas_have_one_entry_per_transition() {
        let net = fixture();
        let layers = net.layer_values(&Matrix::column(&[1.0, 1.0])).unwrap();

        let deltas = net.deltas(&Matrix::column(&[1.0, 0.0]), &layers).unwrap();

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].size(), (3, 1));
        assert_eq!(deltas[1].size(), (2, 1));
    }

    #[test]
    fn deltas_follow_the_chain_rule_on_a_scalar_net() {
        // Identity activations make the arithmetic checkable by hand.
        let config = NetConfig::new(1, 0.1, ActivationFunction::Identity, CostFunction::Mse);
        let mut net = FeedForwardNetwork::new_seeded(&[1, 1, 1], config, 3).unwrap();
        net.weights[0] = Matrix::from_data(vec![vec![2.0]]);
        net.weights[1] = Matrix::from_data(vec![vec![3.0]]);
        net.biases[0] = Matrix::zeros(1, 1);
        net.biases[1] = Matrix::zeros(1, 1);

        // input 1 → hidden 2 → output 6; expected 0.
        let layers = net.layer_values(&Matrix::column(&[1.0])).unwrap();
        let deltas = net.deltas(&Matrix::column(&[0.0]), &layers).unwrap();

        // Output delta: 2·(6 − 0) = 12. Hidden delta: W1ᵗ·12 = 36.
        assert_eq!(deltas[1], Matrix::from_data(vec![vec![12.0]]));
        assert_eq!(deltas[0], Matrix::from_data(vec![vec![36.0]]));
    }

    #[test]
    fn update_takes_one_gradient_step() {
        let config = NetConfig::new(1, 0.1, ActivationFunction::Identity, CostFunction::Mse);
        let mut net = FeedForwardNetwork::new_seeded(&[1, 1], config, 3).unwrap();
        net.weights[0] = Matrix::from_data(vec![vec![0.0]]);

        // input 2, expected 1: output 0, delta = 2·(0 − 1) = −2.
        let inputs = vec![Matrix::column(&[2.0])];
        let outputs = vec![Matrix::column(&[1.0])];
        net.train(&inputs, &outputs).unwrap();

        // w −= 0.1 · (−2 · 2) = +0.4;  b −= 0.1 · (−2) = +0.2.
        assert_eq!(net.weights[0], Matrix::from_data(vec![vec![0.4]]));
        assert_eq!(net.biases[0], Matrix::from_data(vec![vec![0.2]]));
    }

    #[test]
    fn partial_delta_list_updates_only_leading_transitions() {
        let mut net = fixture();
        let before_output_weights = net.weights[1].clone();
        let layers = net.layer_values(&Matrix::column(&[1.0, 1.0])).unwrap();

        // One delta for transition 0 only.
        let partial = vec![Matrix::column(&[0.5, 0.5, 0.5])];
        net.update(&partial, &layers).unwrap();

        assert!(net.weights[1].approx_eq(&before_output_weights, 0.0));
        assert!(!net.weights[0].approx_eq(&fixture().weights[0], 1e-9));
    }

    #[test]
    fn train_rejects_mismatched_sets_before_touching_state() {
        let mut net = fixture();
        let before = net.weights[0].clone();

        let inputs = vec![Matrix::column(&[1.0, 1.0]), Matrix::column(&[0.0, 1.0])];
        let outputs = vec![Matrix::column(&[1.0, 0.0])];

        assert_eq!(
            net.train(&inputs, &outputs),
            Err(NetError::InputSizeMismatch {
                inputs: 2,
                outputs: 1,
            })
        );
        assert!(net.weights[0].approx_eq(&before, 0.0));
    }

    #[test]
    fn training_does_not_increase_cost_on_a_linear_problem() {
        // Learn y = x1 + x2 with a purely linear net.
        let config = NetConfig::new(200, 0.02, ActivationFunction::Identity, CostFunction::Mse);
        let mut net = FeedForwardNetwork::new_seeded(&[2, 1], config, 11).unwrap();

        let inputs = vec![
            Matrix::column(&[0.0, 0.0]),
            Matrix::column(&[1.0, 0.0]),
            Matrix::column(&[0.0, 1.0]),
            Matrix::column(&[1.0, 1.0]),
        ];
        let outputs = vec![
            Matrix::column(&[0.0]),
            Matrix::column(&[1.0]),
            Matrix::column(&[1.0]),
            Matrix::column(&[2.0]),
        ];

        let before = net.evaluate(&inputs, &outputs).unwrap();
        net.train(&inputs, &outputs).unwrap();
        let after = net.evaluate(&inputs, &outputs).unwrap();

        assert!(after <= before + 1e-9, "cost rose from {before} to {after}");
        assert!(after < 0.01, "did not converge: final cost {after}");
    }
}
