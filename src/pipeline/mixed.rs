//! Decomposition of composite-coded mixed features into numeric pairs
//!
//! Two attributes pack two facts into one code:
//!
//! * `PRAEGENDE_JUGENDJAHRE` (1-15): decade of youth and movement
//!   (mainstream or avant-garde)
//! * `CAMEO_INTL_2015` (two digits): wealth tier (tens) and life stage (ones)
//!
//! Each is decoded through a finite enumeration. Generational codes outside
//! the table become missing in both derived columns; wealth composites always
//! split into their tens and ones digits, mapped or not.

use log::{debug, info};
use polars::prelude::*;

use super::error::{CleaningError, Result};

pub const GENERATION_SOURCE: &str = "PRAEGENDE_JUGENDJAHRE";
pub const DECADE_COLUMN: &str = "DECADE";
pub const MOVEMENT_COLUMN: &str = "MOVEMENT";

pub const WEALTH_SOURCE: &str = "CAMEO_INTL_2015";
pub const WEALTH_COLUMN: &str = "WEALTH";
pub const LIFE_STAGE_COLUMN: &str = "LIFE_STAGE";

/// Decade in which a person spent their youth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Decade {
    Forties,
    Fifties,
    Sixties,
    Seventies,
    Eighties,
    Nineties,
}

impl Decade {
    /// Bucket index, 0 for the 40s through 5 for the 90s.
    pub fn index(self) -> i32 {
        self as i32
    }
}

/// Dominating cultural movement of a person's youth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Mainstream,
    Avantgarde,
}

impl Movement {
    /// 0 for mainstream, 1 for avant-garde.
    pub fn flag(self) -> i32 {
        match self {
            Movement::Mainstream => 0,
            Movement::Avantgarde => 1,
        }
    }
}

/// Decoded generational attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    pub decade: Decade,
    pub movement: Movement,
}

impl Generation {
    /// Decode a `PRAEGENDE_JUGENDJAHRE` code; `None` outside 1-15.
    pub fn decode(code: i64) -> Option<Self> {
        use Decade::*;
        use Movement::*;

        let (decade, movement) = match code {
            1 => (Forties, Mainstream),
            2 => (Forties, Avantgarde),
            3 => (Fifties, Mainstream),
            4 => (Fifties, Avantgarde),
            5 => (Sixties, Mainstream),
            6 | 7 => (Sixties, Avantgarde),
            8 => (Seventies, Mainstream),
            9 => (Seventies, Avantgarde),
            10 | 12 => (Eighties, Mainstream),
            11 | 13 => (Eighties, Avantgarde),
            14 => (Nineties, Mainstream),
            15 => (Nineties, Avantgarde),
            _ => return None,
        };

        Some(Self { decade, movement })
    }
}

/// Household wealth tier (tens digit of the CAMEO international code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Wealth {
    Wealthy = 1,
    Prosperous = 2,
    Comfortable = 3,
    LessAffluent = 4,
    Poorer = 5,
}

impl Wealth {
    fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            1 => Some(Self::Wealthy),
            2 => Some(Self::Prosperous),
            3 => Some(Self::Comfortable),
            4 => Some(Self::LessAffluent),
            5 => Some(Self::Poorer),
            _ => None,
        }
    }

    pub fn tier(self) -> i32 {
        self as i32
    }
}

/// Family life stage tier (ones digit of the CAMEO international code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifeStage {
    PreFamily = 1,
    YoungFamily = 2,
    FamiliesWithSchoolAgeChildren = 3,
    OlderFamiliesAndMatureCouples = 4,
    Elders = 5,
}

impl LifeStage {
    fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            1 => Some(Self::PreFamily),
            2 => Some(Self::YoungFamily),
            3 => Some(Self::FamiliesWithSchoolAgeChildren),
            4 => Some(Self::OlderFamiliesAndMatureCouples),
            5 => Some(Self::Elders),
            _ => None,
        }
    }

    pub fn tier(self) -> i32 {
        self as i32
    }
}

/// Decoded wealth/life-stage composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WealthLifeStage {
    /// Both digits name a known tier
    Tiered { wealth: Wealth, life_stage: LifeStage },
    /// At least one digit falls outside the 1-5 tables
    Unmapped { wealth: i64, life_stage: i64 },
}

impl WealthLifeStage {
    /// Split a composite with integer division and modulo by 10.
    pub fn decode(code: i64) -> Self {
        let (wealth, life_stage) = (code / 10, code % 10);
        match (Wealth::from_digit(wealth), LifeStage::from_digit(life_stage)) {
            (Some(wealth), Some(life_stage)) => Self::Tiered { wealth, life_stage },
            _ => Self::Unmapped { wealth, life_stage },
        }
    }

    pub fn is_tiered(&self) -> bool {
        matches!(self, Self::Tiered { .. })
    }

    /// Wealth and life stage values written to the derived columns.
    pub fn digits(&self) -> [i64; 2] {
        match *self {
            Self::Tiered { wealth, life_stage } => {
                [wealth.tier() as i64, life_stage.tier() as i64]
            }
            Self::Unmapped { wealth, life_stage } => [wealth, life_stage],
        }
    }
}

/// Read a code column as integers. Text is parsed; floats must be integral.
fn integer_codes(df: &DataFrame, attribute: &str, context: &str) -> Result<Vec<Option<i64>>> {
    let column = df
        .column(attribute)
        .map_err(|_| CleaningError::schema(attribute, context))?;

    if column.dtype() == &DataType::String {
        return column
            .str()?
            .iter()
            .map(|v| match v {
                Some(text) => text
                    .trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| CleaningError::coercion(attribute, text)),
                None => Ok(None),
            })
            .collect();
    }

    if !column.dtype().is_primitive_numeric() {
        return Err(CleaningError::coercion(attribute, column.dtype()));
    }

    let as_float = column.cast(&DataType::Float64)?;
    as_float
        .f64()?
        .iter()
        .map(|v| match v {
            Some(x) if x.fract() != 0.0 || !x.is_finite() => {
                Err(CleaningError::coercion(attribute, x))
            }
            Some(x) => Ok(Some(x as i64)),
            None => Ok(None),
        })
        .collect()
}

/// Replace `source` with two derived columns built from its decoded codes.
fn replace_with_pair<T>(
    df: DataFrame,
    source: &str,
    decode: impl Fn(i64) -> Option<T>,
    derived: [&str; 2],
    split: impl Fn(&T) -> [i64; 2],
) -> Result<DataFrame> {
    let decoded: Vec<Option<[i32; 2]>> =
        integer_codes(&df, source, "mixed feature decomposition")?
            .into_iter()
            .map(|code| match code.and_then(&decode) {
                Some(d) => {
                    let [a, b] = split(&d);
                    let narrow = |v: i64| {
                        i32::try_from(v).map_err(|_| CleaningError::coercion(source, v))
                    };
                    Ok(Some([narrow(a)?, narrow(b)?]))
                }
                None => Ok(None),
            })
            .collect::<Result<_>>()?;

    let missing = decoded.iter().filter(|d| d.is_none()).count();
    debug!("{}: {} row(s) missing or unmapped", source, missing);

    let mut df = df.drop(source)?;
    for (i, name) in derived.iter().enumerate() {
        let values: Vec<Option<i32>> = decoded.iter().map(|d| d.map(|pair| pair[i])).collect();
        df.with_column(Column::new((*name).into(), values))?;
    }

    info!("Decomposed {} into {} and {}", source, derived[0], derived[1]);
    Ok(df)
}

/// Split `PRAEGENDE_JUGENDJAHRE` into `DECADE` and `MOVEMENT`.
pub fn decompose_generation(df: DataFrame) -> Result<DataFrame> {
    replace_with_pair(
        df,
        GENERATION_SOURCE,
        Generation::decode,
        [DECADE_COLUMN, MOVEMENT_COLUMN],
        |g: &Generation| [g.decade.index() as i64, g.movement.flag() as i64],
    )
}

/// Split `CAMEO_INTL_2015` into `WEALTH` (`v / 10`) and `LIFE_STAGE` (`v % 10`).
///
/// Every present composite is split, including ones whose digits fall outside
/// the tier tables; only a missing composite yields missing outputs.
pub fn decompose_wealth_life_stage(df: DataFrame) -> Result<DataFrame> {
    replace_with_pair(
        df,
        WEALTH_SOURCE,
        |code| Some(WealthLifeStage::decode(code)),
        [WEALTH_COLUMN, LIFE_STAGE_COLUMN],
        WealthLifeStage::digits,
    )
}
