//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::decomposition::DEFAULT_COMPONENTS;
use crate::pipeline::DEFAULT_MAX_MISSING_PER_ROW;

/// demoprep - Clean demographic survey data into numeric features and run PCA
#[derive(Parser, Debug)]
#[command(name = "demoprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Demographics file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Feature summary file (CSV with attribute, information_level, type,
    /// missing_or_unknown columns)
    #[arg(short, long)]
    pub feature_info: PathBuf,

    /// Output file path for the cleaned data (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_cleaned' suffix (e.g., azdias.csv -> azdias_cleaned.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field separator of the demographics CSV
    #[arg(long, default_value = ";", value_parser = parse_separator)]
    pub separator: u8,

    /// Field separator of the feature summary CSV
    #[arg(long, default_value = ";", value_parser = parse_separator)]
    pub feature_info_separator: u8,

    /// Rows with more missing values than this are dropped
    #[arg(long, default_value_t = DEFAULT_MAX_MISSING_PER_ROW)]
    pub max_missing_per_row: usize,

    /// Number of principal components to fit
    #[arg(short = 'n', long, default_value_t = DEFAULT_COMPONENTS, value_parser = validate_components)]
    pub components: usize,

    /// Skip the PCA step and only write the cleaned data
    #[arg(long, default_value = "false")]
    pub no_pca: bool,

    /// Impute missing cells with the column median instead of the mean
    #[arg(long, default_value = "false")]
    pub median: bool,

    /// Do not standardize features before PCA
    #[arg(long, default_value = "false")]
    pub no_scale: bool,

    /// Path of the PCA JSON report.
    /// Defaults to input directory with '_pca.json' suffix.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Number of strongest weights shown per component
    #[arg(long, default_value = "5")]
    pub top_weights: usize,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Get the output path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_cleaned' suffix.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let extension = self
                .input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("parquet");
            self.sibling_path(&format!("_cleaned.{}", extension))
        })
    }

    /// Get the PCA report path, deriving from input if not explicitly provided.
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.sibling_path("_pca.json"))
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let parent = self
            .input
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."));
        let stem = self
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        parent.join(format!("{}{}", stem, suffix))
    }
}

/// Parser for single-byte CSV separators (`\t` accepted for tabs)
fn parse_separator(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("separator must be a single ASCII character, got '{}'", s)),
    }
}

/// Validator for the components parameter
fn validate_components(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("components must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
