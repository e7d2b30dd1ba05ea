//! Cleaning orchestrator - runs every stage in its fixed order

use std::time::Instant;

use log::info;
use polars::prelude::*;

use super::categorical::reencode_categoricals;
use super::error::{CleaningError, Result};
use super::feature_info::FeatureInfo;
use super::missing::{normalize_missing, prune_columns, prune_rows};
use super::mixed::{
    decompose_generation, decompose_wealth_life_stage, GENERATION_SOURCE, WEALTH_SOURCE,
};
use crate::report::{CleaningStage, CleaningSummary};

/// Mixed-type columns left over after decomposition, always dropped last.
pub const RESIDUAL_COLUMNS: [&str; 2] = ["LP_LEBENSPHASE_FEIN", "LP_LEBENSPHASE_GROB"];

/// Default cap on missing cells per retained row.
pub const DEFAULT_MAX_MISSING_PER_ROW: usize = 10;

/// Tunables for [`clean_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningConfig {
    /// Rows with strictly more missing cells than this are dropped
    pub max_missing_per_row: usize,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            max_missing_per_row: DEFAULT_MAX_MISSING_PER_ROW,
        }
    }
}

/// Output of the cleaning pipeline.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub frame: DataFrame,
    pub summary: CleaningSummary,
}

/// Run the full cleaning pipeline over `df`.
///
/// Order matters: categoricals are re-encoded before the mixed features are
/// decomposed (the mixed sources are not typed categorical), and the residual
/// columns are dropped last so they survive re-encoding untouched. A missing
/// residual column is fatal.
///
/// # Arguments
/// * `df` - Raw demographics dataset
/// * `feature_info` - Attribute metadata shared by every stage
/// * `config` - Row pruning threshold
pub fn clean_data(
    df: DataFrame,
    feature_info: &FeatureInfo,
    config: &CleaningConfig,
) -> Result<CleanedData> {
    let mut summary = CleaningSummary::new(df.height(), df.width());

    let started = Instant::now();
    let df = normalize_missing(df, feature_info)?;
    summary.record_time(CleaningStage::Normalize, started.elapsed());

    let started = Instant::now();
    let (df, dropped_columns) = prune_columns(df, feature_info)?;
    summary.dropped_columns = dropped_columns;
    summary.record_time(CleaningStage::PruneColumns, started.elapsed());

    let started = Instant::now();
    let (df, dropped_rows) = prune_rows(df, config.max_missing_per_row)?;
    summary.dropped_rows = dropped_rows;
    summary.record_time(CleaningStage::PruneRows, started.elapsed());

    let started = Instant::now();
    let (df, split) = reencode_categoricals(df, feature_info)?;
    summary.multi_level_dropped = split.multi_level;
    summary.binary_expanded = split.binary;
    summary.record_time(CleaningStage::Reencode, started.elapsed());

    let started = Instant::now();
    let df = decompose_generation(df)?;
    let df = decompose_wealth_life_stage(df)?;
    summary.decomposed = vec![GENERATION_SOURCE.to_string(), WEALTH_SOURCE.to_string()];
    summary.record_time(CleaningStage::Decompose, started.elapsed());

    let df = drop_residual_columns(df)?;
    summary.residual_dropped = RESIDUAL_COLUMNS.iter().map(|s| s.to_string()).collect();

    summary.final_rows = df.height();
    summary.final_columns = df.width();
    info!(
        "Cleaned dataset: {} x {} -> {} x {}",
        summary.initial_rows, summary.initial_columns, summary.final_rows, summary.final_columns
    );

    Ok(CleanedData { frame: df, summary })
}

/// Drop the residual mixed-type columns; each must be present.
pub fn drop_residual_columns(mut df: DataFrame) -> Result<DataFrame> {
    for name in RESIDUAL_COLUMNS {
        if df.column(name).is_err() {
            return Err(CleaningError::schema(name, "residual column drop"));
        }
        df = df.drop(name)?;
    }
    Ok(df)
}
