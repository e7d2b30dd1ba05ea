//! demoprep: Demographic Feature Preparation Library
//!
//! Cleans survey-style demographic data into numeric features (missing value
//! normalization, pruning, categorical re-encoding, mixed feature
//! decomposition) and runs a principal component analysis over the result.

pub mod cli;
pub mod decomposition;
pub mod pipeline;
pub mod report;
pub mod utils;
