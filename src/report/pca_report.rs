//! PCA diagnostics: component loadings table, scree series and JSON export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

use crate::decomposition::Pca;

/// Loadings and variance of a single component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRow {
    /// "Dimension 1", "Dimension 2", ...
    pub dimension: String,
    /// Explained variance ratio, rounded to 4 decimals
    pub explained_variance: f64,
    /// One weight per feature, rounded to 4 decimals
    pub weights: Vec<f64>,
}

/// Per-component breakdown of feature weights and explained variance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentReport {
    pub features: Vec<String>,
    pub rows: Vec<ComponentRow>,
}

/// One point of the scree chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreePoint {
    /// Zero-based component index
    pub component: usize,
    pub variance_ratio: f64,
    pub cumulative: f64,
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Build the labeled component table from a fitted model.
pub fn pca_results(pca: &Pca) -> ComponentReport {
    let rows = pca
        .components()
        .iter()
        .zip(pca.explained_variance_ratio())
        .enumerate()
        .map(|(i, (weights, ratio))| ComponentRow {
            dimension: format!("Dimension {}", i + 1),
            explained_variance: round4(*ratio),
            weights: weights.iter().map(|w| round4(*w)).collect(),
        })
        .collect();

    ComponentReport {
        features: pca.feature_names().to_vec(),
        rows,
    }
}

/// Per-component and cumulative explained variance.
pub fn scree_series(pca: &Pca) -> Vec<ScreePoint> {
    let mut cumulative = 0.0;
    pca.explained_variance_ratio()
        .iter()
        .enumerate()
        .map(|(component, &variance_ratio)| {
            cumulative += variance_ratio;
            ScreePoint {
                component,
                variance_ratio,
                cumulative,
            }
        })
        .collect()
}

impl ComponentReport {
    /// Features of a component ordered by absolute weight, largest first.
    pub fn top_features(&self, component: usize, count: usize) -> Vec<(String, f64)> {
        let Some(row) = self.rows.get(component) else {
            return Vec::new();
        };
        let mut weighted: Vec<(String, f64)> = self
            .features
            .iter()
            .cloned()
            .zip(row.weights.iter().copied())
            .collect();
        weighted.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        weighted.truncate(count);
        weighted
    }

    /// Print each component's variance and its strongest feature weights.
    pub fn display(&self, top_n: usize) {
        println!();
        println!(
            "    {} {}",
            style("🧭").cyan(),
            style("PRINCIPAL COMPONENTS").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Dimension").add_attribute(Attribute::Bold),
            Cell::new("Explained Variance").add_attribute(Attribute::Bold),
            Cell::new("Top Weights").add_attribute(Attribute::Bold),
        ]);

        for (i, row) in self.rows.iter().enumerate() {
            let top = self
                .top_features(i, top_n)
                .into_iter()
                .map(|(name, w)| format!("{} ({:+.4})", name, w))
                .collect::<Vec<_>>()
                .join("\n");
            table.add_row(vec![
                Cell::new(&row.dimension),
                Cell::new(format!("{:.4}", row.explained_variance)).fg(Color::Yellow),
                Cell::new(top),
            ]);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Print the scree series as a table with a text bar per component.
pub fn display_scree(series: &[ScreePoint]) {
    println!();
    println!(
        "    {} {}",
        style("📈").cyan(),
        style("EXPLAINED VARIANCE PER COMPONENT").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Component").add_attribute(Attribute::Bold),
        Cell::new("Variance").add_attribute(Attribute::Bold),
        Cell::new("Cumulative").add_attribute(Attribute::Bold),
        Cell::new("").add_attribute(Attribute::Bold),
    ]);

    for point in series {
        let bar = "█".repeat((point.variance_ratio * 100.0).round() as usize);
        table.add_row(vec![
            Cell::new(point.component),
            Cell::new(format!("{:.2}%", point.variance_ratio * 100.0)),
            Cell::new(format!("{:.2}%", point.cumulative * 100.0)).fg(Color::Green),
            Cell::new(bar).fg(Color::Cyan),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Metadata about the decomposition run
#[derive(Debug, Serialize)]
pub struct PcaMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    pub demoprep_version: String,
    pub input_file: String,
    pub n_components: usize,
    pub n_samples: usize,
    pub n_features: usize,
}

/// Complete PCA export with metadata
#[derive(Debug, Serialize)]
pub struct PcaExport {
    pub metadata: PcaMetadata,
    pub components: ComponentReport,
    pub scree: Vec<ScreePoint>,
}

impl PcaExport {
    pub fn new(pca: &Pca, input_file: &str) -> Self {
        Self {
            metadata: PcaMetadata {
                timestamp: Utc::now().to_rfc3339(),
                demoprep_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.to_string(),
                n_components: pca.n_components(),
                n_samples: pca.n_samples(),
                n_features: pca.feature_names().len(),
            },
            components: pca_results(pca),
            scree: scree_series(pca),
        }
    }
}

/// Write the PCA results as pretty-printed JSON
pub fn export_pca_report(pca: &Pca, input_file: &str, output_path: &Path) -> Result<()> {
    let export = PcaExport::new(pca, input_file);
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize PCA report")?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write PCA report: {}", output_path.display()))?;
    Ok(())
}
