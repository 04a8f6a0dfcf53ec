use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::loss::cost_type::CostFunction;

/// Hyperparameters and pluggable functions for one network.
///
/// # Fields
/// - `iterations`         — full passes over the training data; must be ≥ 1
/// - `learning_rate`      — gradient-descent step size; must be > 0
/// - `default_activation` — activation used by every layer without an override
/// - `layer_activations`  — per-layer overrides, indexed by layer; a `None`
///                          (or missing) entry falls back to the default
/// - `cost`               — cost-derivative used to inject the output error
///
/// The fallback is a deliberate default-propagation policy: most networks use
/// one activation everywhere and override only the odd layer (commonly the
/// output). Requiring the default at construction makes "no activation
/// anywhere" unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetConfig {
    pub iterations: usize,
    pub learning_rate: f64,
    pub default_activation: ActivationFunction,
    pub layer_activations: Vec<Option<ActivationFunction>>,
    pub cost: CostFunction,
}

impl NetConfig {
    /// Creates a config with no per-layer overrides.
    pub fn new(
        iterations: usize,
        learning_rate: f64,
        default_activation: ActivationFunction,
        cost: CostFunction,
    ) -> Self {
        NetConfig {
            iterations,
            learning_rate,
            default_activation,
            layer_activations: Vec::new(),
            cost,
        }
    }

    /// Overrides the activation for one layer index; builder-style.
    pub fn with_activation(mut self, layer: usize, activation: ActivationFunction) -> Self {
        if self.layer_activations.len() <= layer {
            self.layer_activations.resize(layer + 1, None);
        }
        self.layer_activations[layer] = Some(activation);
        self
    }

    /// The activation for `layer`: its override if one is set, otherwise the
    /// default (the layer-0 fallback policy).
    pub fn activation(&self, layer: usize) -> ActivationFunction {
        self.layer_activations
            .get(layer)
            .copied()
            .flatten()
            .unwrap_or(self.default_activation)
    }

    /// Construction-time validation, called by the network constructors
    /// before any weight is allocated.
    pub fn validate(&self, layer_count: usize) -> Result<()> {
        if self.iterations == 0 {
            return Err(NetError::InvalidConfig(
                "iteration count must be at least 1".into(),
            ));
        }
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(NetError::InvalidConfig(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if self.layer_activations.len() > layer_count {
            return Err(NetError::InvalidConfig(format!(
                "{} activation overrides configured for a {}-layer network",
                self.layer_activations.len(),
                layer_count
            )));
        }
        Ok(())
    }
}
