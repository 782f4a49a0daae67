pub mod cuisine;
pub mod features;
pub mod filter;
pub mod ingredients;
pub mod model;
pub mod ranker;
pub mod recommendations;
pub mod scorer;

pub use model::{ModelHandle, ScoringModel};
