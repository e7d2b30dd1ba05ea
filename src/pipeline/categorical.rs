//! Categorical re-encoding: drop multi-level attributes, one-hot binary ones

use std::collections::BTreeSet;

use log::{debug, info};
use polars::prelude::*;

use super::error::{CleaningError, Result};
use super::feature_info::{FeatureInfo, FeatureKind};

/// Binary avant-garde/mainstream flag, already 0/1 and kept as is.
pub const AVANTGARDE_FLAG: &str = "GREEN_AVANTGARDE";

/// Categoricals with more distinct observed values than this are multi-level.
const MAX_BINARY_LEVELS: usize = 2;

/// Partition of the categorical attributes seen by the re-encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoricalSplit {
    /// Dropped attributes
    pub multi_level: Vec<String>,
    /// One-hot expanded attributes (the avant-garde flag excluded)
    pub binary: Vec<String>,
}

/// A distinct observed value of a categorical column.
#[derive(Debug, Clone, PartialEq)]
enum Level {
    Number(f64),
    Text(String),
}

impl Level {
    fn label(&self) -> String {
        match self {
            Level::Number(v) if v.fract() == 0.0 => format!("{}", *v as i64),
            Level::Number(v) => v.to_string(),
            Level::Text(s) => s.clone(),
        }
    }
}

/// Distinct non-null values of a column, sorted ascending. Non-finite floats
/// are not levels.
fn observed_levels(column: &Column) -> Result<Vec<Level>> {
    if column.dtype() == &DataType::String {
        let levels: BTreeSet<&str> = column.str()?.iter().flatten().collect();
        return Ok(levels.into_iter().map(|s| Level::Text(s.to_string())).collect());
    }

    let as_float = column.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = as_float
        .f64()?
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    Ok(values.into_iter().map(Level::Number).collect())
}

/// One 0/1 indicator per level; null source rows are 0 everywhere.
fn indicator_columns(column: &Column, attribute: &str, levels: &[Level]) -> Result<Vec<Column>> {
    let matches: Vec<Vec<i32>> = if column.dtype() == &DataType::String {
        let values: Vec<Option<&str>> = column.str()?.iter().collect();
        levels
            .iter()
            .map(|level| {
                values
                    .iter()
                    .map(|v| match (v, level) {
                        (Some(v), Level::Text(t)) if *v == t.as_str() => 1,
                        _ => 0,
                    })
                    .collect()
            })
            .collect()
    } else {
        let as_float = column.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = as_float.f64()?.iter().collect();
        levels
            .iter()
            .map(|level| {
                values
                    .iter()
                    .map(|v| match (v, level) {
                        (Some(v), Level::Number(n)) if v == n => 1,
                        _ => 0,
                    })
                    .collect()
            })
            .collect()
    };

    Ok(levels
        .iter()
        .zip(matches)
        .map(|(level, values)| {
            Column::new(format!("{}_{}", attribute, level.label()).into(), values)
        })
        .collect())
}

/// Re-encode the categorical attributes still present in `df`.
///
/// Multi-level attributes are dropped. Binary attributes other than
/// [`AVANTGARDE_FLAG`] are replaced by indicator columns appended at the end in
/// metadata order. Fails if the avant-garde flag is not a binary categorical
/// column at this point, or if an indicator name is already taken.
///
/// # Arguments
/// * `df` - DataFrame after missing value normalization and pruning
/// * `feature_info` - Metadata deciding which columns are categorical
///
/// # Returns
/// The re-encoded frame and the multi-level/binary partition
pub fn reencode_categoricals(
    df: DataFrame,
    feature_info: &FeatureInfo,
) -> Result<(DataFrame, CategoricalSplit)> {
    let mut split = CategoricalSplit::default();

    for attr in feature_info.present_of_kind(&df, &FeatureKind::Categorical) {
        let column = df.column(&attr.name)?;
        let levels = observed_levels(column)?.len();
        debug!("{}: {} observed level(s)", attr.name, levels);
        if levels > MAX_BINARY_LEVELS {
            split.multi_level.push(attr.name.clone());
        } else {
            split.binary.push(attr.name.clone());
        }
    }

    let flag_position = split
        .binary
        .iter()
        .position(|name| name == AVANTGARDE_FLAG)
        .ok_or_else(|| CleaningError::schema(AVANTGARDE_FLAG, "binary categorical attributes"))?;
    split.binary.remove(flag_position);

    let mut indicators = Vec::new();
    for attribute in &split.binary {
        let column = df.column(attribute)?;
        let levels = observed_levels(column)?;
        indicators.extend(indicator_columns(column, attribute, &levels)?);
    }

    let mut df = df.drop_many(
        split
            .multi_level
            .iter()
            .chain(split.binary.iter())
            .map(|s| s.as_str()),
    );
    for indicator in indicators {
        if df.column(indicator.name()).is_ok() {
            return Err(CleaningError::schema(
                indicator.name(),
                "indicator column already exists",
            ));
        }
        df.with_column(indicator)?;
    }

    info!(
        "Dropped {} multi-level and expanded {} binary categorical attribute(s)",
        split.multi_level.len(),
        split.binary.len()
    );

    Ok((df, split))
}
