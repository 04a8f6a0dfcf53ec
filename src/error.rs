use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NetError>;

/// Every failure the engine can surface.
///
/// All errors are value-level and caller-catchable: shape mismatches are
/// raised synchronously by the matrix operation that detects them, and
/// training-set mismatches are checked eagerly, before any weight is touched.
/// Nothing in the engine retries or recovers internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetError {
    /// An arithmetic or product operation was attempted on matrices whose
    /// shapes are incompatible for that operation.
    #[error("shape mismatch in `{op}`: left is {lhs:?}, right is {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// The training input set and expected-output set have different lengths.
    #[error("training set mismatch: {inputs} inputs but {outputs} expected outputs")]
    InputSizeMismatch { inputs: usize, outputs: usize },

    /// A recurrent training or inference call received a sequence with no
    /// timesteps.
    #[error("input sequence has no timesteps")]
    EmptySequence,

    /// The layer topology handed to a network constructor is unusable.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// The network configuration fails construction-time validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
