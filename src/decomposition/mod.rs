//! Decomposition module - feature matrix preparation and PCA

pub mod matrix;
pub mod pca;

pub use matrix::*;
pub use pca::*;
