pub mod activation;
pub mod config;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use config::net_config::NetConfig;
pub use error::{NetError, Result};
pub use loss::cost_type::CostFunction;
pub use math::matrix::Matrix;
pub use network::feed_forward::FeedForwardNetwork;
pub use network::recurrent::RecurrentNetwork;
