//! Pipeline module - streaming aggregation and mutual information ranking

pub mod aggregator;
pub mod error;
pub mod loader;
pub mod mutual_info;
pub mod parser;

pub use aggregator::*;
pub use error::*;
pub use loader::*;
pub use mutual_info::*;
pub use parser::*;
