pub mod config;
pub mod flat;
pub mod tree;

pub use config::*;
pub use flat::*;
pub use tree::*;
