//! Missing value normalization and missing-based pruning

use log::{debug, info};
use polars::prelude::*;

use super::error::{CleaningError, Result};
use super::feature_info::{FeatureInfo, Sentinel};

/// Number of columns removed by [`prune_columns`].
pub const COLUMNS_TO_PRUNE: usize = 6;

/// Missing cell count of a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Replace every sentinel value declared in the metadata with null.
///
/// Attributes listed in the metadata but absent from `df` are skipped.
/// Column dtypes are preserved.
///
/// # Arguments
/// * `df` - Raw dataset, consumed and returned with sentinels nulled
/// * `feature_info` - Metadata supplying each attribute's `missing_or_unknown` codes
pub fn normalize_missing(mut df: DataFrame, feature_info: &FeatureInfo) -> Result<DataFrame> {
    let sentinel_map = feature_info.sentinel_map()?;

    for (attribute, sentinels) in &sentinel_map {
        if sentinels.is_empty() {
            continue;
        }
        let Ok(column) = df.column(attribute) else {
            continue;
        };

        let replaced = null_sentinels(column, attribute, sentinels)?;
        let newly_missing = replaced.null_count() - column.null_count();
        if newly_missing > 0 {
            debug!("{}: {} sentinel value(s) set to missing", attribute, newly_missing);
        }
        df.with_column(replaced)?;
    }

    Ok(df)
}

fn null_sentinels(column: &Column, attribute: &str, sentinels: &[Sentinel]) -> Result<Column> {
    let name = column.name().clone();

    if column.dtype() == &DataType::String {
        let values: Vec<Option<&str>> = column
            .str()?
            .iter()
            .map(|v| v.filter(|text| !matches_text(text, sentinels)))
            .collect();
        return Ok(Column::new(name, values));
    }

    if !column.dtype().is_primitive_numeric() {
        return Err(CleaningError::coercion(attribute, column.dtype()));
    }

    let codes: Vec<f64> = sentinels
        .iter()
        .filter_map(|s| match s {
            Sentinel::Code(code) => Some(*code as f64),
            Sentinel::Token(_) => None,
        })
        .collect();

    let as_float = column.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = as_float
        .f64()?
        .iter()
        .map(|v| v.filter(|x| !codes.contains(x)))
        .collect();

    Ok(Column::new(name, values).cast(column.dtype())?)
}

fn matches_text(text: &str, sentinels: &[Sentinel]) -> bool {
    let trimmed = text.trim();
    sentinels.iter().any(|s| match s {
        Sentinel::Token(token) => trimmed == token,
        Sentinel::Code(code) => trimmed.parse::<i64>().map_or(false, |v| v == *code),
    })
}

/// Count missing cells per column, ranked by count descending then name ascending.
pub fn missing_counts(df: &DataFrame) -> Vec<MissingCount> {
    let mut counts: Vec<MissingCount> = df
        .get_columns()
        .iter()
        .map(|col| MissingCount {
            column: col.name().to_string(),
            missing: col.null_count(),
        })
        .collect();

    counts.sort_by(|a, b| b.missing.cmp(&a.missing).then_with(|| a.column.cmp(&b.column)));
    counts
}

/// Drop the [`COLUMNS_TO_PRUNE`] columns with the most missing cells.
///
/// Only attributes known to the metadata are ranked; ties are broken
/// alphabetically by name. Returns the pruned frame and the dropped names in
/// ranking order.
///
/// # Arguments
/// * `df` - DataFrame with sentinels already normalized to null
/// * `feature_info` - Metadata restricting which columns may be pruned
pub fn prune_columns(df: DataFrame, feature_info: &FeatureInfo) -> Result<(DataFrame, Vec<String>)> {
    let dropped: Vec<String> = missing_counts(&df)
        .into_iter()
        .filter(|c| feature_info.get(&c.column).is_some())
        .take(COLUMNS_TO_PRUNE)
        .map(|c| {
            debug!("Pruning column {} ({} missing)", c.column, c.missing);
            c.column
        })
        .collect();

    let df = df.drop_many(dropped.iter().map(|s| s.as_str()));
    info!("Dropped {} column(s) with the most missing values", dropped.len());

    Ok((df, dropped))
}

/// Count missing cells per row across all columns.
pub fn row_missing_counts(df: &DataFrame) -> Vec<usize> {
    let mut counts = vec![0usize; df.height()];
    for col in df.get_columns() {
        let nulls = col.as_materialized_series().is_null();
        for (count, is_null) in counts.iter_mut().zip(nulls.iter()) {
            if is_null.unwrap_or(false) {
                *count += 1;
            }
        }
    }
    counts
}

/// Drop every row with strictly more than `max_missing` missing cells.
///
/// Returns the filtered frame and the number of rows removed.
///
/// # Arguments
/// * `df` - DataFrame after column pruning
/// * `max_missing` - Largest missing cell count a retained row may have
pub fn prune_rows(df: DataFrame, max_missing: usize) -> Result<(DataFrame, usize)> {
    let keep: Vec<bool> = row_missing_counts(&df)
        .into_iter()
        .map(|count| count <= max_missing)
        .collect();

    let original_height = df.height();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let df = df.filter(&mask)?;
    let dropped = original_height - df.height();

    info!(
        "Dropped {} of {} row(s) with more than {} missing value(s)",
        dropped, original_height, max_missing
    );

    Ok((df, dropped))
}
