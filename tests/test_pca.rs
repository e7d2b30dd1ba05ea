//! Tests for the feature matrix builder, PCA fit and PCA reporting

use demoprep::decomposition::*;
use demoprep::pipeline::*;
use demoprep::report::{pca_results, scree_series, PcaExport};
use faer::Mat;
use polars::prelude::*;
use rand::{Rng, SeedableRng};

#[path = "common/mod.rs"]
mod common;

use common::*;

const TOLERANCE: f64 = 1e-9;

/// Correlated synthetic data: column 1 follows column 0, column 3 is noise
fn synthetic_matrix(rows: usize, seed: u64) -> FeatureMatrix {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let base: Vec<f64> = (0..rows).map(|_| rng.gen_range(-3.0..3.0)).collect();
    let other: Vec<f64> = (0..rows).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let noise: Vec<f64> = (0..rows).map(|_| rng.gen_range(-0.1..0.1)).collect();

    let data = Mat::from_fn(rows, 4, |i, j| match j {
        0 => base[i],
        1 => 2.0 * base[i] + noise[i],
        2 => other[i],
        _ => noise[(i + 1) % rows],
    });
    let names = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
    FeatureMatrix::from_mat(names, data).unwrap()
}

#[test]
fn test_explained_variance_ratios_are_ordered() {
    let matrix = synthetic_matrix(200, 42);
    let (pca, _) = Pca::fit(&matrix, 4).unwrap();

    let ratios = pca.explained_variance_ratio();
    assert_eq!(ratios.len(), 4);
    assert!(ratios.iter().all(|r| *r >= 0.0));
    for pair in ratios.windows(2) {
        assert!(pair[0] + TOLERANCE >= pair[1], "ratios must be non-increasing: {:?}", ratios);
    }
    let total: f64 = ratios.iter().sum();
    assert!((total - 1.0).abs() < 1e-6, "all components explain everything, got {}", total);
    // The first component captures the a/b pair
    assert!(ratios[0] > 0.8);
}

#[test]
fn test_partial_fit_explains_at_most_everything() {
    let matrix = synthetic_matrix(120, 3);
    let (pca, _) = Pca::fit(&matrix, 2).unwrap();

    let total: f64 = pca.explained_variance_ratio().iter().sum();
    assert!(total <= 1.0 + TOLERANCE);
    assert_eq!(pca.n_components(), 2);
    assert_eq!(pca.explained_variance().len(), 2);
}

#[test]
fn test_components_are_orthonormal_and_sign_normalized() {
    let matrix = synthetic_matrix(150, 11);
    let (pca, _) = Pca::fit(&matrix, 3).unwrap();
    let components = pca.components();

    for (i, a) in components.iter().enumerate() {
        assert_eq!(a.len(), 4);
        for (j, b) in components.iter().enumerate() {
            let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((dot - expected).abs() < 1e-8, "component {} . {} = {}", i, j, dot);
        }

        let dominant = a
            .iter()
            .copied()
            .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
        assert!(dominant > 0.0, "largest loading of component {} must be positive", i);
    }
}

#[test]
fn test_fit_is_deterministic() {
    let matrix = synthetic_matrix(80, 5);
    let (first, _) = Pca::fit(&matrix, 3).unwrap();
    let (second, _) = Pca::fit(&matrix, 3).unwrap();

    assert_eq!(first.components(), second.components());
    assert_eq!(first.explained_variance_ratio(), second.explained_variance_ratio());
}

#[test]
fn test_projection_shape_and_transform() {
    let matrix = synthetic_matrix(60, 9);
    let (pca, projected) = Pca::fit(&matrix, 2).unwrap();

    assert_eq!(projected.nrows(), 60);
    assert_eq!(projected.ncols(), 2);

    let transformed = pca.transform(&matrix).unwrap();
    for i in 0..60 {
        for k in 0..2 {
            assert!((transformed[(i, k)] - projected[(i, k)]).abs() < 1e-10);
        }
    }
}

#[test]
fn test_transform_rejects_feature_mismatch() {
    let matrix = synthetic_matrix(30, 1);
    let (pca, _) = Pca::fit(&matrix, 2).unwrap();

    let narrow = FeatureMatrix::from_mat(vec!["a".to_string()], Mat::zeros(5, 1)).unwrap();
    assert!(matches!(
        pca.transform(&narrow),
        Err(CleaningError::Decomposition(_))
    ));
}

#[test]
fn test_too_many_components_is_an_error() {
    let matrix = synthetic_matrix(30, 1);

    assert!(matches!(Pca::fit(&matrix, 5), Err(CleaningError::Decomposition(_))));
    assert!(matches!(Pca::fit(&matrix, 0), Err(CleaningError::Decomposition(_))));
}

#[test]
fn test_single_sample_is_an_error() {
    let matrix = FeatureMatrix::from_mat(
        vec!["a".to_string(), "b".to_string()],
        Mat::from_fn(1, 2, |_, j| j as f64),
    )
    .unwrap();

    assert!(matches!(Pca::fit(&matrix, 1), Err(CleaningError::Decomposition(_))));
}

#[test]
fn test_from_mat_rejects_name_mismatch() {
    let result = FeatureMatrix::from_mat(vec!["a".to_string()], Mat::zeros(3, 2));
    assert!(result.is_err());
}

#[test]
fn test_from_frame_imputes_and_skips_scaling() {
    let df = df! {
        "x" => [Some(1i64), None, Some(3)],
        "y" => [Some(2.0f64), Some(4.0), None],
    }
    .unwrap();
    let config = MatrixConfig {
        impute: ImputeStrategy::Mean,
        standardize: false,
    };

    let matrix = FeatureMatrix::from_frame(&df, &config).unwrap();

    assert_eq!(matrix.names(), &["x".to_string(), "y".to_string()]);
    assert_eq!(matrix.data()[(1, 0)], 2.0);
    assert_eq!(matrix.data()[(2, 1)], 3.0);
}

#[test]
fn test_from_frame_rejects_text_columns() {
    let df = df! {
        "OST_WEST_KZ" => ["O", "W"],
    }
    .unwrap();

    let err = FeatureMatrix::from_frame(&df, &MatrixConfig::default()).unwrap_err();
    assert!(matches!(err, CleaningError::TypeCoercion { .. }));
}

#[test]
fn test_pca_on_cleaned_fixture() {
    let info = create_feature_info();
    let cleaned = clean_data(
        create_demographics_dataframe(),
        &info,
        &CleaningConfig::default(),
    )
    .unwrap();

    let matrix = FeatureMatrix::from_frame(&cleaned.frame, &MatrixConfig::default()).unwrap();
    assert_eq!(matrix.n_samples(), 8);
    assert_eq!(matrix.n_features(), 11);

    let (pca, projected) = Pca::fit(&matrix, 3).unwrap();
    assert_eq!(projected.ncols(), 3);
    assert_eq!(pca.feature_names(), matrix.names());
}

#[test]
fn test_pca_results_labels_and_rounding() {
    let matrix = synthetic_matrix(100, 17);
    let (pca, _) = Pca::fit(&matrix, 3).unwrap();

    let report = pca_results(&pca);

    let labels: Vec<&str> = report.rows.iter().map(|r| r.dimension.as_str()).collect();
    assert_eq!(labels, vec!["Dimension 1", "Dimension 2", "Dimension 3"]);
    assert_eq!(report.features, vec!["a", "b", "c", "d"]);

    for row in &report.rows {
        assert_eq!(row.weights.len(), 4);
        for value in row.weights.iter().chain(std::iter::once(&row.explained_variance)) {
            let scaled = value * 10_000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{} not rounded to 4 places", value);
        }
    }
}

#[test]
fn test_top_features_ordered_by_magnitude() {
    let matrix = synthetic_matrix(100, 23);
    let (pca, _) = Pca::fit(&matrix, 2).unwrap();
    let report = pca_results(&pca);

    let top = report.top_features(0, 2);
    assert_eq!(top.len(), 2);
    assert!(top[0].1.abs() >= top[1].1.abs());
    // a and b dominate the first component
    let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"a") && names.contains(&"b"), "got {:?}", names);

    assert!(report.top_features(5, 2).is_empty());
}

#[test]
fn test_scree_series_is_cumulative() {
    let matrix = synthetic_matrix(100, 29);
    let (pca, _) = Pca::fit(&matrix, 4).unwrap();

    let series = scree_series(&pca);

    assert_eq!(series.len(), 4);
    assert_eq!(series[0].component, 0);
    assert_eq!(series[0].cumulative, series[0].variance_ratio);
    for pair in series.windows(2) {
        assert!(pair[1].cumulative >= pair[0].cumulative);
    }
    assert!(series[3].cumulative <= 1.0 + TOLERANCE);
}

#[test]
fn test_export_metadata() {
    let matrix = synthetic_matrix(40, 31);
    let (pca, _) = Pca::fit(&matrix, 2).unwrap();

    let export = PcaExport::new(&pca, "azdias.csv");

    assert_eq!(export.metadata.input_file, "azdias.csv");
    assert_eq!(export.metadata.n_components, 2);
    assert_eq!(export.metadata.n_samples, 40);
    assert_eq!(export.metadata.n_features, 4);
    assert_eq!(export.scree.len(), 2);

    let json = serde_json::to_value(&export).unwrap();
    assert_eq!(json["components"]["rows"][0]["dimension"], "Dimension 1");
}
