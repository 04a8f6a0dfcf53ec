use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::net_config::NetConfig;
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::feed_forward::FeedForwardNetwork;

/// A many-inputs-to-one-output recurrent network.
///
/// Wraps a [`FeedForwardNetwork`] and adds one square recurrent weight matrix
/// per *hidden* layer (every layer except input and output). During the
/// unrolled forward pass each hidden layer receives, on top of the usual
/// affine transform, its own prior-timestep activation fed through that
/// recurrent matrix. Output is read only at the final timestep; training
/// injects error there and walks it backward through time (BPTT).
///
/// The embedded network and the recurrent matrices are exclusively owned;
/// nothing is shared across networks.
#[derive(Debug, Clone)]
pub struct RecurrentNetwork {
    pub network: FeedForwardNetwork,
    /// `recurrent_weights[i]` carries hidden layer `i + 1`, shape
    /// `(nodes[i+1], nodes[i+1])`.
    pub recurrent_weights: Vec<Matrix>,
}

impl RecurrentNetwork {
    pub fn new(topology: &[usize], config: NetConfig) -> Result<Self> {
        Self::from_rng(topology, config, &mut rand::thread_rng())
    }

    /// Seeded variant; the embedded network and the recurrent matrices draw
    /// from the same RNG stream, so a seed pins down the whole initial state.
    pub fn new_seeded(topology: &[usize], config: NetConfig, seed: u64) -> Result<Self> {
        Self::from_rng(topology, config, &mut StdRng::seed_from_u64(seed))
    }

    fn from_rng<R: Rng>(topology: &[usize], config: NetConfig, rng: &mut R) -> Result<Self> {
        let network = FeedForwardNetwork::from_rng(topology, config, rng)?;

        let mut recurrent_weights = Vec::with_capacity(topology.len().saturating_sub(2));
        for &nodes in &topology[1..topology.len() - 1] {
            let std_dev = (1.0 / nodes as f64).sqrt();
            recurrent_weights.push(Matrix::gaussian_with(rng, nodes, nodes, std_dev));
        }

        Ok(RecurrentNetwork {
            network,
            recurrent_weights,
        })
    }

    /// Number of hidden layers (= number of recurrent matrices).
    pub fn hidden_layers(&self) -> usize {
        self.recurrent_weights.len()
    }

    /// Unrolls one input sequence through time, left-to-right.
    ///
    /// Returns the per-timestep layer-value vectors (pre-activations, as in
    /// [`FeedForwardNetwork::layer_values`]). At every timestep after the
    /// first, each hidden layer's pre-activation gains
    /// `recurrent_weights[i] · act_{i+1}(previous timestep's layer i+1)`.
    pub fn unroll(&self, sequence: &[Matrix]) -> Result<Vec<Vec<Matrix>>> {
        if sequence.is_empty() {
            return Err(NetError::EmptySequence);
        }

        let mut all_layers: Vec<Vec<Matrix>> = Vec::with_capacity(sequence.len());

        for input in sequence {
            let prev = all_layers.last().map(|layers| layers.as_slice());
            let layers = self.step(input, prev)?;
            all_layers.push(layers);
        }

        Ok(all_layers)
    }

    /// Runs inference over a whole sequence: the final timestep's output
    /// layer with its activation applied (many-to-one).
    pub fn output(&self, sequence: &[Matrix]) -> Result<Matrix> {
        let all_layers = self.unroll(sequence)?;
        let layers = &all_layers[all_layers.len() - 1];
        let last = layers.len() - 1;
        Ok(self.network.config.activation(last).apply(&layers[last]))
    }

    /// Trains on `(sequences[k], outputs[k])` pairs, in order, for the
    /// configured number of iterations, using backpropagation through time.
    ///
    /// Per sequence: error is injected only at the final timestep from the
    /// single expected output; the delta vector is then carried backward one
    /// timestep at a time. At each visited timestep the carried deltas
    /// update the recurrent matrices (against that timestep's activated
    /// hidden layers) and the shared feed-forward weights, then step back
    /// through the recurrent matrices. Timestep 0's stepped-back delta is
    /// computed and discarded — there is no predecessor to apply it to.
    ///
    /// Fails with `InputSizeMismatch` (set lengths) or `EmptySequence`
    /// before any weight is touched. Returns the mean cost over the final
    /// iteration, measured at each sequence's final output.
    pub fn train(&mut self, sequences: &[Vec<Matrix>], outputs: &[Matrix]) -> Result<f64> {
        if sequences.len() != outputs.len() {
            return Err(NetError::InputSizeMismatch {
                inputs: sequences.len(),
                outputs: outputs.len(),
            });
        }
        if sequences.iter().any(|sequence| sequence.is_empty()) {
            return Err(NetError::EmptySequence);
        }

        let lr = self.network.config.learning_rate;
        let mut mean_cost = 0.0;

        for _ in 0..self.network.config.iterations {
            let mut total = 0.0;

            for (sequence, expected) in sequences.iter().zip(outputs.iter()) {
                let all_layers = self.unroll(sequence)?;
                let final_t = all_layers.len() - 1;

                let final_layers = &all_layers[final_t];
                let last = final_layers.len() - 1;
                let actual = self.network.config.activation(last).apply(&final_layers[last]);
                total += self.network.config.cost.cost(expected, &actual)?;

                // Inject error at the final timestep only.
                let mut deltas = self.network.deltas(expected, final_layers)?;
                self.network.update(&deltas, final_layers)?;

                for t in (0..final_t).rev() {
                    let layers = &all_layers[t];

                    for (i, recurrent) in self.recurrent_weights.iter_mut().enumerate() {
                        let act = self.network.config.activation(i + 1);
                        let carried = act.apply(&layers[i + 1]);
                        let grad = deltas[i].dot(&carried.transpose())?.scale(lr);
                        *recurrent = recurrent.sub(&grad)?;
                    }

                    self.network.update(&deltas, layers)?;
                    deltas = self.step_back(&deltas, layers)?;
                }
            }

            mean_cost = if sequences.is_empty() {
                0.0
            } else {
                total / sequences.len() as f64
            };
        }

        Ok(mean_cost)
    }

    /// Mean cost over a dataset of sequences without updating any weight.
    pub fn evaluate(&self, sequences: &[Vec<Matrix>], outputs: &[Matrix]) -> Result<f64> {
        if sequences.len() != outputs.len() {
            return Err(NetError::InputSizeMismatch {
                inputs: sequences.len(),
                outputs: outputs.len(),
            });
        }
        if sequences.is_empty() {
            return Ok(0.0);
        }

        let mut total = 0.0;
        for (sequence, expected) in sequences.iter().zip(outputs.iter()) {
            let actual = self.output(sequence)?;
            total += self.network.config.cost.cost(expected, &actual)?;
        }

        Ok(total / sequences.len() as f64)
    }

    /// One timestep of the unrolled forward pass. `prev_layers` is the full
    /// layer-value vector of the prior timestep, or `None` at t = 0.
    fn step(&self, input: &Matrix, prev_layers: Option<&[Matrix]>) -> Result<Vec<Matrix>> {
        let transitions = self.network.transitions();
        let mut layers = Vec::with_capacity(transitions + 1);
        layers.push(input.clone());

        for i in 0..transitions {
            let activated = self.network.config.activation(i).apply(&layers[i]);
            let mut next = self.network.weights[i].dot(&activated)?.add(&self.network.biases[i])?;

            // Hidden layers carry their own prior-timestep activation.
            if i < self.recurrent_weights.len() {
                if let Some(prev) = prev_layers {
                    let act = self.network.config.activation(i + 1);
                    let carried = act.apply(&prev[i + 1]);
                    next = next.add(&self.recurrent_weights[i].dot(&carried)?)?;
                }
            }

            layers.push(next);
        }

        Ok(layers)
    }

    /// Propagates a delta vector backward one timestep:
    /// `new_delta[i] = (recurrent_weights[i]ᵗ · delta[i]) ⊙ act_{i+1}'(layers[i+1])`.
    /// Only hidden layers survive the step — the output transition carries
    /// error at the final timestep alone.
    fn step_back(&self, deltas: &[Matrix], layers: &[Matrix]) -> Result<Vec<Matrix>> {
        let mut stepped = Vec::with_capacity(self.recurrent_weights.len());

        for (i, recurrent) in self.recurrent_weights.iter().enumerate() {
            let act = self.network.config.activation(i + 1);
            let delta = recurrent
                .transpose()
                .dot(&deltas[i])?
                .hadamard(&act.apply_derivative(&layers[i + 1]))?;
            stepped.push(delta);
        }

        Ok(stepped)
    }
}
