//! demoprep: Demographic Feature Preparation CLI
//!
//! Cleans a demographics table with its feature summary, writes the cleaned
//! data and optionally fits a PCA over it.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use demoprep::cli::{confirm_overwrite, Cli};
use demoprep::decomposition::{FeatureMatrix, ImputeStrategy, MatrixConfig, Pca};
use demoprep::pipeline::{
    clean_data, dataset_stats, load_dataset, load_feature_info, save_dataset, CleaningConfig,
};
use demoprep::report::{display_scree, export_pca_report, pca_results, scree_series};
use demoprep::utils::{
    create_spinner, finish_with_error, finish_with_success, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let output_path = cli.output_path();
    let components = (!cli.no_pca).then_some(cli.components);

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        &cli.feature_info,
        &output_path,
        cli.max_missing_per_row,
        components,
    );

    // Step 1: Load inputs
    print_step_header(1, "Load Data");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading feature summary and demographics...");
    let feature_info = load_feature_info(&cli.feature_info, cli.feature_info_separator)?;
    let df = load_dataset(&cli.input, cli.separator, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Data loaded");

    let (rows, cols, memory_mb) = dataset_stats(&df);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Attributes described: {}", feature_info.len());
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Clean
    print_step_header(2, "Clean Features");
    let step_start = Instant::now();
    let spinner = create_spinner("Normalizing, pruning, re-encoding and decomposing...");
    let config = CleaningConfig {
        max_missing_per_row: cli.max_missing_per_row,
    };
    let cleaned = match clean_data(df, &feature_info, &config) {
        Ok(cleaned) => {
            finish_with_success(&spinner, "Cleaning complete");
            cleaned
        }
        Err(e) => {
            finish_with_error(&spinner, "Cleaning failed");
            return Err(e).context("Failed to clean dataset");
        }
    };
    let mut frame = cleaned.frame;
    let summary = cleaned.summary;

    print_count(
        "row(s) with too many missing values",
        summary.dropped_rows,
        Some(&format!("(>{} missing)", cli.max_missing_per_row)),
    );
    summary.display();
    summary.display_timings();
    print_step_time(step_start.elapsed());

    // Step 3: Save cleaned data
    print_step_header(3, "Save Cleaned Data");
    if cli.no_confirm || confirm_overwrite(&output_path)? {
        let step_start = Instant::now();
        let spinner = create_spinner("Writing output file...");
        save_dataset(&mut frame, &output_path)?;
        finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
        print_step_time(step_start.elapsed());
    } else {
        print_info("Skipped writing cleaned data");
    }

    // Step 4: PCA
    if let Some(n_components) = components {
        print_step_header(4, "Principal Component Analysis");
        let step_start = Instant::now();
        let matrix_config = MatrixConfig {
            impute: if cli.median {
                ImputeStrategy::Median
            } else {
                ImputeStrategy::Mean
            },
            standardize: !cli.no_scale,
        };
        let matrix = FeatureMatrix::from_frame(&frame, &matrix_config)
            .context("Failed to build feature matrix")?;
        let (pca, _projected) =
            Pca::fit(&matrix, n_components).context("Failed to fit PCA")?;
        print_success(&format!(
            "Fitted {} component(s) over {} feature(s)",
            pca.n_components(),
            matrix.n_features()
        ));

        pca_results(&pca).display(cli.top_weights);
        display_scree(&scree_series(&pca));

        let report_path = cli.report_path();
        if cli.no_confirm || confirm_overwrite(&report_path)? {
            export_pca_report(&pca, &cli.input.display().to_string(), &report_path)?;
            print_success(&format!("PCA report written to {}", report_path.display()));
        }
        print_step_time(step_start.elapsed());
    }

    print_completion();
    Ok(())
}
