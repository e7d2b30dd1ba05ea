//! Feature metadata table: one entry per attribute of the demographics data

use polars::prelude::*;

use super::error::{CleaningError, Result};

/// Candidate raw values that may be declared as "missing or unknown".
pub const SENTINEL_CANDIDATES: [&str; 5] = ["X", "XX", "-1", "0", "9"];

/// Candidates that stay string tokens instead of being coerced to integers.
const STRING_SENTINELS: [&str; 2] = ["X", "XX"];

/// Declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureKind {
    Categorical,
    Mixed,
    Numeric,
    Ordinal,
    Interval,
    Other(String),
}

impl FeatureKind {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "categorical" => Self::Categorical,
            "mixed" => Self::Mixed,
            "numeric" => Self::Numeric,
            "ordinal" => Self::Ordinal,
            "interval" => Self::Interval,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A raw value that must be reinterpreted as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentinel {
    /// Numeric code, matched against numeric cells or integer-looking text
    Code(i64),
    /// String token, matched only against text cells
    Token(String),
}

/// Metadata for a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub name: String,
    pub information_level: String,
    pub kind: FeatureKind,
    /// Raw specification, e.g. `[-1,0]` or `[-1,XX]`
    pub missing_or_unknown: String,
}

impl AttributeInfo {
    pub fn new(name: &str, kind: FeatureKind, missing_or_unknown: &str) -> Self {
        Self {
            name: name.to_string(),
            information_level: String::new(),
            kind,
            missing_or_unknown: missing_or_unknown.to_string(),
        }
    }

    /// Split the `missing_or_unknown` specification into its raw tokens.
    pub fn missing_tokens(&self) -> Vec<&str> {
        self.missing_or_unknown
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Sentinel set for this attribute, scanned in candidate order.
    pub fn sentinels(&self) -> Result<Vec<Sentinel>> {
        let tokens = self.missing_tokens();
        let mut sentinels = Vec::new();

        for candidate in SENTINEL_CANDIDATES {
            if !tokens.contains(&candidate) {
                continue;
            }
            if STRING_SENTINELS.contains(&candidate) {
                sentinels.push(Sentinel::Token(candidate.to_string()));
            } else {
                let code = candidate
                    .parse::<i64>()
                    .map_err(|_| CleaningError::coercion(&self.name, candidate))?;
                sentinels.push(Sentinel::Code(code));
            }
        }

        Ok(sentinels)
    }
}

/// Sentinel set per attribute, in metadata order.
pub type SentinelMap = Vec<(String, Vec<Sentinel>)>;

/// The feature summary table, read-only for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureInfo {
    attributes: Vec<AttributeInfo>,
}

impl FeatureInfo {
    pub fn new(attributes: Vec<AttributeInfo>) -> Self {
        Self { attributes }
    }

    /// Build the table from a frame with `attribute`, `type` and
    /// `missing_or_unknown` columns (`information_level` is optional).
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let text_column = |name: &str| -> Result<Vec<String>> {
            let column = df
                .column(name)
                .map_err(|_| CleaningError::Metadata(format!("missing column '{}'", name)))?
                .cast(&DataType::String)?;
            Ok(column
                .str()?
                .iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect())
        };

        let names = text_column("attribute")?;
        let kinds = text_column("type")?;
        let missing = text_column("missing_or_unknown")?;
        let levels = if df.get_column_names().iter().any(|c| c.as_str() == "information_level") {
            text_column("information_level")?
        } else {
            vec![String::new(); names.len()]
        };

        let attributes = names
            .into_iter()
            .zip(kinds)
            .zip(missing)
            .zip(levels)
            .map(|(((name, kind), missing_or_unknown), information_level)| AttributeInfo {
                name,
                information_level,
                kind: FeatureKind::parse(&kind),
                missing_or_unknown,
            })
            .collect();

        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[AttributeInfo] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes of the given kind that are still columns of `df`, in metadata order.
    pub fn present_of_kind(&self, df: &DataFrame, kind: &FeatureKind) -> Vec<&AttributeInfo> {
        let columns = df.get_column_names();
        self.attributes
            .iter()
            .filter(|a| &a.kind == kind && columns.iter().any(|c| c.as_str() == a.name))
            .collect()
    }

    /// Derive the sentinel mapping for every attribute.
    pub fn sentinel_map(&self) -> Result<SentinelMap> {
        self.attributes
            .iter()
            .map(|a| Ok((a.name.clone(), a.sentinels()?)))
            .collect()
    }
}
