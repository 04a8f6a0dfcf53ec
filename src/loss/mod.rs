pub mod cost_type;
pub mod mae;
pub mod mse;

pub use cost_type::CostFunction;
pub use mae::MaeCost;
pub use mse::MseCost;
