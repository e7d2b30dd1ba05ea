//! Shared test utilities and fixture generators
#![allow(dead_code)]

use demoprep::pipeline::{AttributeInfo, FeatureInfo, FeatureKind};
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Feature summary rows: (attribute, information_level, type, missing_or_unknown)
pub const FEATURE_SUMMARY: [(&str, &str, &str, &str); 16] = [
    ("AGER_TYP", "person", "categorical", "[-1,0]"),
    ("ALTER_HH", "household", "interval", "[0]"),
    ("ALTERSKATEGORIE_GROB", "person", "ordinal", "[-1,0,9]"),
    ("ANREDE_KZ", "person", "categorical", "[-1,0]"),
    ("CAMEO_DEUG_2015", "microcell_rr4", "categorical", "[-1,X]"),
    ("CAMEO_INTL_2015", "microcell_rr4", "mixed", "[-1,XX]"),
    ("GEBURTSJAHR", "person", "numeric", "[0]"),
    ("GREEN_AVANTGARDE", "person", "categorical", "[]"),
    ("KBA05_BAUMAX", "microcell_rr3", "mixed", "[-1,0]"),
    ("KK_KUNDENTYP", "household", "categorical", "[]"),
    ("LP_LEBENSPHASE_FEIN", "person", "mixed", "[0]"),
    ("LP_LEBENSPHASE_GROB", "person", "mixed", "[0]"),
    ("OST_WEST_KZ", "building", "categorical", "[-1]"),
    ("PRAEGENDE_JUGENDJAHRE", "person", "mixed", "[-1,0]"),
    ("SEMIO_SOZ", "person", "ordinal", "[-1,9]"),
    ("TITEL_KZ", "person", "categorical", "[-1,0]"),
];

/// Columns with the most missing values after normalization, in pruning order
///
/// TITEL_KZ (7), KK_KUNDENTYP (6), GEBURTSJAHR (5), KBA05_BAUMAX (5),
/// AGER_TYP (4), ALTER_HH (4); ties resolve alphabetically.
pub const EXPECTED_PRUNED_COLUMNS: [&str; 6] = [
    "TITEL_KZ",
    "KK_KUNDENTYP",
    "GEBURTSJAHR",
    "KBA05_BAUMAX",
    "AGER_TYP",
    "ALTER_HH",
];

/// Build the feature metadata matching [`create_demographics_dataframe`]
pub fn create_feature_info() -> FeatureInfo {
    FeatureInfo::new(
        FEATURE_SUMMARY
            .iter()
            .map(|(name, level, kind, missing)| {
                let mut attr = AttributeInfo::new(name, FeatureKind::parse(kind), missing);
                attr.information_level = level.to_string();
                attr
            })
            .collect(),
    )
}

/// Feature summary as `;`-separated CSV text
pub fn feature_info_csv() -> String {
    let mut text = String::from("attribute;information_level;type;missing_or_unknown\n");
    for (name, level, kind, missing) in FEATURE_SUMMARY {
        text.push_str(&format!("{};{};{};{}\n", name, level, kind, missing));
    }
    text
}

/// Create a small demographics DataFrame with known missing patterns
///
/// Row 4 carries four sentinel/missing values in kept columns, row 2 two and
/// row 6 one; every other kept cell is present.
pub fn create_demographics_dataframe() -> DataFrame {
    df! {
        "AGER_TYP" => [-1i64, -1, 0, 0, 2, 1, 3, 1],
        "ALTER_HH" => [0i64, 0, 0, 0, 12, 15, 10, 17],
        "ALTERSKATEGORIE_GROB" => [2i64, 1, 3, 4, 9, 2, 3, 1],
        "ANREDE_KZ" => [1i64, 2, 2, 1, 2, 1, 0, 2],
        "CAMEO_DEUG_2015" => ["8", "4", "2", "6", "X", "1", "9", "5"],
        "CAMEO_INTL_2015" => ["51", "24", "12", "43", "XX", "34", "55", "15"],
        "GEBURTSJAHR" => [0i64, 0, 0, 0, 0, 1967, 1980, 1955],
        "GREEN_AVANTGARDE" => [0i64, 1, 0, 0, 1, 0, 1, 0],
        "KBA05_BAUMAX" => [0i64, 0, 0, 0, 0, 1, 5, 1],
        "KK_KUNDENTYP" => [None::<i64>, None, None, None, None, None, Some(3), Some(1)],
        "LP_LEBENSPHASE_FEIN" => [21i64, 3, 0, 32, 8, 2, 5, 12],
        "LP_LEBENSPHASE_GROB" => [6i64, 1, 0, 10, 2, 1, 2, 4],
        "OST_WEST_KZ" => ["W", "W", "O", "W", "O", "W", "W", "O"],
        "PRAEGENDE_JUGENDJAHRE" => [14i64, 15, 8, 8, 0, 3, 2, 5],
        "SEMIO_SOZ" => [5i64, 4, 6, 2, 7, 3, 4, 1],
        "TITEL_KZ" => [0i64, 0, 0, 0, 0, 0, 0, 1],
    }
    .unwrap()
}

/// Create a larger random demographics DataFrame with the same schema
pub fn create_large_demographics_dataframe(rows: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut codes = |low: i64, high: i64| -> Vec<i64> {
        (0..rows).map(|_| rng.gen_range(low..=high)).collect()
    };
    // The six pruning targets are about half missing; kept columns at most ~11%
    let ager = codes(-1, 2);
    let alter: Vec<i64> = codes(0, 1).into_iter().map(|v| v * 15).collect();
    let geburt: Vec<i64> = codes(0, 1).into_iter().map(|v| v * 1970).collect();
    let baumax = codes(0, 1);
    let kunden: Vec<Option<i64>> = codes(0, 1)
        .into_iter()
        .map(|v| if v == 0 { None } else { Some(v) })
        .collect();
    let titel = codes(0, 1);

    let alterskat = codes(1, 9);
    let anrede = codes(1, 2);
    let deug: Vec<String> = codes(0, 9)
        .into_iter()
        .map(|v| if v == 0 { "X".to_string() } else { v.to_string() })
        .collect();
    let intl: Vec<String> = codes(0, 25)
        .into_iter()
        .map(|v| if v == 0 { "XX".to_string() } else { format!("{}{}", 1 + v % 5, 1 + v / 5 % 5) })
        .collect();
    let green = codes(0, 1);
    let fein = codes(1, 40);
    let grob = codes(1, 12);
    let ost: Vec<&str> = codes(0, 1).into_iter().map(|v| if v == 0 { "O" } else { "W" }).collect();
    let praegende = codes(1, 15);
    let semio = codes(1, 9);

    df! {
        "AGER_TYP" => ager,
        "ALTER_HH" => alter,
        "ALTERSKATEGORIE_GROB" => alterskat,
        "ANREDE_KZ" => anrede,
        "CAMEO_DEUG_2015" => deug,
        "CAMEO_INTL_2015" => intl,
        "GEBURTSJAHR" => geburt,
        "GREEN_AVANTGARDE" => green,
        "KBA05_BAUMAX" => baumax,
        "KK_KUNDENTYP" => kunden,
        "LP_LEBENSPHASE_FEIN" => fein,
        "LP_LEBENSPHASE_GROB" => grob,
        "OST_WEST_KZ" => ost,
        "PRAEGENDE_JUGENDJAHRE" => praegende,
        "SEMIO_SOZ" => semio,
        "TITEL_KZ" => titel,
    }
    .unwrap()
}

/// Create a temporary directory with a `;`-separated CSV of `df`
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("azdias.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file)
        .with_separator(b';')
        .finish(df)
        .unwrap();

    (temp_dir, csv_path)
}

/// Write the feature summary CSV into `dir`
pub fn write_feature_info_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("feat_info.csv");
    std::fs::write(&path, feature_info_csv()).unwrap();
    path
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Read an integer column as options
pub fn int_values(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .iter()
        .collect()
}
