//! Report module - cleaning summaries and PCA diagnostics

pub mod pca_report;
pub mod summary;

pub use pca_report::*;
pub use summary::*;
