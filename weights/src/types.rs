use std::fmt;
use std::str::FromStr;

use crate::error::PlsError;
use crate::scale::Scale;
use crate::table::DataTable;

/// Outer estimation mode of a latent variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reflective: weights are covariances of the MVs with the inner estimate.
    A,
    /// Formative: weights are regression coefficients of the inner estimate on the MVs.
    B,
}

/// Inner weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Centroid,
    Factorial,
    Path,
}

impl FromStr for Scheme {
    type Err = PlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "centroid" => Ok(Scheme::Centroid),
            "factorial" => Ok(Scheme::Factorial),
            "path" => Ok(Scheme::Path),
            other => Err(PlsError::Configuration(format!(
                "unknown inner weighting scheme: {other}"
            ))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scheme::Centroid => "centroid",
            Scheme::Factorial => "factorial",
            Scheme::Path => "path",
        };
        f.write_str(name)
    }
}

/// A manifest variable as declared in the outer model. `scale == None` means
/// the variable is used as-is (metric), or falls back to a model default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MvSpec {
    pub name: String,
    pub scale: Option<Scale>,
}

impl MvSpec {
    pub fn new(name: impl Into<String>, scale: Option<Scale>) -> Self {
        Self {
            name: name.into(),
            scale,
        }
    }

    pub fn metric(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Outer model of one latent variable, with MV scales already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub lv: String,
    pub mode: Mode,
    pub mvs: Vec<MvSpec>,
}

impl Block {
    pub fn new(lv: impl Into<String>, mode: Mode, mvs: Vec<MvSpec>) -> Self {
        Self {
            lv: lv.into(),
            mode,
            mvs,
        }
    }

    pub fn mv_names(&self) -> Vec<&str> {
        self.mvs.iter().map(|mv| mv.name.as_str()).collect()
    }
}

/// True when no MV in any block carries a scale.
pub fn blocks_are_metric<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> bool {
    blocks
        .into_iter()
        .all(|block| block.mvs.iter().all(|mv| mv.scale.is_none()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct OuterWeight {
    pub lv: String,
    pub mv: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OuterWeights {
    pub entries: Vec<OuterWeight>,
}

impl OuterWeights {
    pub fn push(&mut self, lv: &str, mv: &str, weight: f64) {
        self.entries.push(OuterWeight {
            lv: lv.to_string(),
            mv: mv.to_string(),
            weight,
        });
    }

    pub fn get(&self, lv: &str, mv: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.lv == lv && e.mv == mv)
            .map(|e| e.weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one weights calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightsOutput {
    /// MV data as actually used by the final iteration (quantified when non-metric).
    pub final_data: DataTable,
    /// One column per latent variable, in path order.
    pub scores: DataTable,
    pub weights: OuterWeights,
    pub iterations: usize,
}
