//! Principal component analysis via thin SVD of the centered matrix

use faer::Mat;
use log::info;

use super::matrix::FeatureMatrix;
use crate::pipeline::error::{CleaningError, Result};

/// Default number of components kept by the CLI.
pub const DEFAULT_COMPONENTS: usize = 10;

/// A fitted PCA model.
#[derive(Debug, Clone)]
pub struct Pca {
    feature_names: Vec<String>,
    n_samples: usize,
    /// Per-feature means subtracted before projection
    mean: Vec<f64>,
    /// `n_components` rows of `n_features` loadings
    components: Vec<Vec<f64>>,
    singular_values: Vec<f64>,
    explained_variance: Vec<f64>,
    explained_variance_ratio: Vec<f64>,
}

impl Pca {
    /// Fit `n_components` components and return the model with the projected data.
    ///
    /// Components are sign-normalized so the largest-magnitude loading of each
    /// is positive, which keeps repeated fits identical.
    ///
    /// # Arguments
    /// * `matrix` - Imputed (and usually standardized) samples x features matrix
    /// * `n_components` - Components to keep, between 1 and min(samples, features)
    pub fn fit(matrix: &FeatureMatrix, n_components: usize) -> Result<(Self, Mat<f64>)> {
        let n_samples = matrix.n_samples();
        let n_features = matrix.n_features();
        let max_components = n_samples.min(n_features);

        if n_samples < 2 {
            return Err(CleaningError::Decomposition(format!(
                "at least 2 samples are required, got {}",
                n_samples
            )));
        }
        if n_components == 0 || n_components > max_components {
            return Err(CleaningError::Decomposition(format!(
                "n_components={} must be between 1 and min(n_samples, n_features)={}",
                n_components, max_components
            )));
        }

        let data = matrix.data();
        let mean: Vec<f64> = (0..n_features)
            .map(|j| (0..n_samples).map(|i| data[(i, j)]).sum::<f64>() / n_samples as f64)
            .collect();
        let centered = center(data, &mean);

        let svd = centered.as_ref().thin_svd();
        let v = svd.v().to_owned();
        let singular_values: Vec<f64> = svd.s_diagonal().iter().copied().collect();

        let total_ss: f64 = singular_values.iter().map(|s| s * s).sum();
        let components: Vec<Vec<f64>> = (0..n_components)
            .map(|k| {
                let mut loadings: Vec<f64> = (0..n_features).map(|j| v[(j, k)]).collect();
                flip_sign(&mut loadings);
                loadings
            })
            .collect();

        let kept = &singular_values[..n_components];
        let explained_variance: Vec<f64> =
            kept.iter().map(|s| s * s / (n_samples - 1) as f64).collect();
        let explained_variance_ratio: Vec<f64> = kept
            .iter()
            .map(|s| if total_ss > 0.0 { s * s / total_ss } else { 0.0 })
            .collect();

        let pca = Self {
            feature_names: matrix.names().to_vec(),
            n_samples,
            mean,
            components,
            singular_values: kept.to_vec(),
            explained_variance,
            explained_variance_ratio,
        };
        info!(
            "Fitted {} component(s) explaining {:.1}% of variance",
            n_components,
            pca.explained_variance_ratio.iter().sum::<f64>() * 100.0
        );

        let projected = pca.project(&centered);
        Ok((pca, projected))
    }

    /// Project a matrix with the same features onto the fitted components.
    pub fn transform(&self, matrix: &FeatureMatrix) -> Result<Mat<f64>> {
        if matrix.n_features() != self.mean.len() {
            return Err(CleaningError::Decomposition(format!(
                "expected {} features, got {}",
                self.mean.len(),
                matrix.n_features()
            )));
        }
        Ok(self.project(&center(matrix.data(), &self.mean)))
    }

    fn project(&self, centered: &Mat<f64>) -> Mat<f64> {
        let n_features = self.mean.len();
        let n_components = self.components.len();
        let mut loadings = Mat::<f64>::zeros(n_features, n_components);
        for (k, component) in self.components.iter().enumerate() {
            for (j, &w) in component.iter().enumerate() {
                loadings[(j, k)] = w;
            }
        }
        centered.as_ref() * loadings.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[Vec<f64>] {
        &self.components
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance
    }

    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio
    }
}

fn center(data: &Mat<f64>, mean: &[f64]) -> Mat<f64> {
    Mat::from_fn(data.nrows(), data.ncols(), |i, j| data[(i, j)] - mean[j])
}

fn flip_sign(loadings: &mut [f64]) {
    let pivot = loadings
        .iter()
        .copied()
        .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        loadings.iter_mut().for_each(|x| *x = -*x);
    }
}
