use std::fmt;
use std::str::FromStr;

use ndarray::Array1;

use crate::error::{PlsError, Result};
use crate::treat::standardize;

/// What a non-metric scale transform needs from the running estimation.
pub trait ScaleContext {
    /// For each observation, the mean of `lv`'s current inner estimate over all
    /// observations sharing that observation's raw value of `mv`.
    fn mv_grouped_by_lv(&self, lv: &str, mv: &str) -> Result<Array1<f64>>;

    /// Factor applied after standardizing a quantified MV.
    fn correction(&self) -> f64;
}

/// Measurement scale of a manifest variable.
///
/// Ordinal and nominal variables are currently quantified exactly like
/// numeric ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Num,
    Raw,
    Ord,
    Nom,
}

impl Scale {
    pub fn scale(&self, lv: &str, mv: &str, weights: &impl ScaleContext) -> Result<Array1<f64>> {
        let grouped = weights.mv_grouped_by_lv(lv, mv)?;
        match self {
            Scale::Raw => Ok(grouped),
            Scale::Num | Scale::Ord | Scale::Nom => {
                Ok(standardize(grouped.view())? * weights.correction())
            }
        }
    }
}

impl FromStr for Scale {
    type Err = PlsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NUM" => Ok(Scale::Num),
            "RAW" => Ok(Scale::Raw),
            "ORD" => Ok(Scale::Ord),
            "NOM" => Ok(Scale::Nom),
            other => Err(PlsError::Configuration(format!("unknown scale: {other}"))),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scale::Num => "NUM",
            Scale::Raw => "RAW",
            Scale::Ord => "ORD",
            Scale::Nom => "NOM",
        };
        f.write_str(name)
    }
}
