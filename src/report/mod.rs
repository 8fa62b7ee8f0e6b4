//! Report module - summary, coverage and mutual information reports

pub mod coverage;
pub mod export;
pub mod mutual;
pub mod summary;
pub mod writer;

pub use coverage::*;
pub use export::*;
pub use mutual::*;
pub use summary::*;
pub use writer::*;
