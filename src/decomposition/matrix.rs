//! Dense feature matrix built from the cleaned frame
//!
//! The cleaned frame may still hold missing cells (up to the row threshold),
//! so every column is imputed, and by default standardized, before it is
//! handed to the decomposition.

use faer::Mat;
use log::debug;
use polars::prelude::*;

use crate::pipeline::error::{CleaningError, Result};

/// Strategy for filling missing cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImputeStrategy {
    /// Replace missing cells with the column mean.
    #[default]
    Mean,
    /// Replace missing cells with the column median.
    Median,
}

/// Options for [`FeatureMatrix::from_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixConfig {
    pub impute: ImputeStrategy,
    /// Scale each column to zero mean and unit variance
    pub standardize: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            impute: ImputeStrategy::Mean,
            standardize: true,
        }
    }
}

/// Samples x features matrix with its feature names.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    names: Vec<String>,
    data: Mat<f64>,
}

impl FeatureMatrix {
    /// Build the matrix from an all-numeric frame.
    pub fn from_frame(df: &DataFrame, config: &MatrixConfig) -> Result<Self> {
        let n_rows = df.height();
        let mut names = Vec::with_capacity(df.width());
        let mut data = Mat::<f64>::zeros(n_rows, df.width());

        for (col_idx, column) in df.get_columns().iter().enumerate() {
            let name = column.name().to_string();
            if !column.dtype().is_primitive_numeric() && column.dtype() != &DataType::Boolean {
                return Err(CleaningError::coercion(&name, column.dtype()));
            }

            let as_float = column.cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = as_float.f64()?.iter().collect();
            let filled = fill_missing(&values, config.impute);
            let scaled = if config.standardize {
                standardize(&filled)
            } else {
                filled
            };

            for (row_idx, value) in scaled.into_iter().enumerate() {
                data[(row_idx, col_idx)] = value;
            }
            names.push(name);
        }

        debug!("Built {} x {} feature matrix", n_rows, names.len());
        Ok(Self { names, data })
    }

    /// Wrap an existing matrix; `names` must match its column count.
    pub fn from_mat(names: Vec<String>, data: Mat<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(CleaningError::Decomposition(format!(
                "{} feature names for {} columns",
                names.len(),
                data.ncols()
            )));
        }
        Ok(Self { names, data })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn data(&self) -> &Mat<f64> {
        &self.data
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }
}

fn fill_missing(values: &[Option<f64>], strategy: ImputeStrategy) -> Vec<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();

    let fill = if present.is_empty() {
        0.0
    } else {
        match strategy {
            ImputeStrategy::Mean => present.iter().sum::<f64>() / present.len() as f64,
            ImputeStrategy::Median => {
                present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let mid = present.len() / 2;
                if present.len() % 2 == 0 {
                    (present[mid - 1] + present[mid]) / 2.0
                } else {
                    present[mid]
                }
            }
        }
    };

    values.iter().map(|v| v.unwrap_or(fill)).collect()
}

/// Zero mean, unit (population) variance; constant columns are only centered.
fn standardize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    values
        .iter()
        .map(|x| if std > 0.0 { (x - mean) / std } else { x - mean })
        .collect()
}
