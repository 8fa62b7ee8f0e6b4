//! featdiag: Sparse Sample Diagnosis Library
//!
//! Streams labeled sparse samples once, aggregating per-feature and per-row
//! indices, then reports widths, coverage and mutual information between
//! each feature's presence and the binary label.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
