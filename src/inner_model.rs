use ndarray::{Array2, Axis};
use plspm_weights::treat::correlation;
use plspm_weights::{
    DataTable, OuterWeights, PathMatrix, Result, WeightsCalculator, WeightsOutput, ols,
    r_squared,
};
use tracing::debug;

use crate::config::Config;
use crate::estimator::Estimator;

/// Structural coefficients laid out like the path matrix: `values[[s, d]]`
/// is the effect of `s` on `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCoefficients {
    pub names: Vec<String>,
    pub values: Array2<f64>,
}

impl PathCoefficients {
    pub fn get(&self, source: &str, destination: &str) -> Option<f64> {
        let s = self.names.iter().position(|n| n == source)?;
        let d = self.names.iter().position(|n| n == destination)?;
        Some(self.values[[s, d]])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InnerSummary {
    pub path_coefficients: PathCoefficients,
    /// R² of every endogenous LV, in path order.
    pub r_squared: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loading {
    pub lv: String,
    pub mv: String,
    pub loading: f64,
}

/// Regresses every endogenous LV score on the scores of its predecessors.
pub fn inner_summary(path: &PathMatrix, scores: &DataTable) -> Result<InnerSummary> {
    let n_lv = path.len();
    let mut values = Array2::<f64>::zeros((n_lv, n_lv));
    let mut rows = Vec::new();

    let mut y_all = Array2::<f64>::zeros((scores.nrows(), n_lv));
    for (j, name) in path.names().iter().enumerate() {
        y_all.column_mut(j).assign(&scores.require_column(name)?);
    }

    for (j, name) in path.names().iter().enumerate() {
        let predecessors: Vec<usize> = (0..n_lv)
            .filter(|k| path.values()[[*k, j]] == 1)
            .collect();
        if predecessors.is_empty() {
            continue;
        }
        let x = y_all.select(Axis(1), &predecessors);
        let beta = ols(&x, y_all.column(j))?;
        for (k, b) in predecessors.iter().zip(beta.iter()) {
            values[[*k, j]] = *b;
        }
        let r2 = r_squared(&x, y_all.column(j), &beta);
        debug!(lv = %name, r2, "inner regression");
        rows.push((name.clone(), r2));
    }

    Ok(InnerSummary {
        path_coefficients: PathCoefficients {
            names: path.names().to_vec(),
            values,
        },
        r_squared: rows,
    })
}

/// Correlation of every weighted MV with its LV score.
pub fn loadings(
    weights: &OuterWeights,
    final_data: &DataTable,
    scores: &DataTable,
) -> Result<Vec<Loading>> {
    let mut out = Vec::with_capacity(weights.len());
    for entry in &weights.entries {
        let mv = final_data.require_column(&entry.mv)?;
        let lv = scores.require_column(&entry.lv)?;
        out.push(Loading {
            lv: entry.lv.clone(),
            mv: entry.mv.clone(),
            loading: correlation(mv, lv),
        });
    }
    Ok(out)
}

/// A fitted PLS path model.
#[derive(Debug, Clone)]
pub struct Plspm {
    pub output: WeightsOutput,
    pub inner: InnerSummary,
    pub loadings: Vec<Loading>,
}

impl Plspm {
    pub fn fit<C: WeightsCalculator + ?Sized>(
        config: &Config,
        calculator: &C,
        data: &DataTable,
    ) -> Result<Plspm> {
        let estimator = Estimator::new(config)?;
        let output = estimator.estimate(calculator, data)?;
        let inner = inner_summary(config.path(), &output.scores)?;
        let loadings = loadings(&output.weights, &output.final_data, &output.scores)?;
        Ok(Plspm {
            output,
            inner,
            loadings,
        })
    }

    pub fn scores(&self) -> &DataTable {
        &self.output.scores
    }

    pub fn weights(&self) -> &OuterWeights {
        &self.output.weights
    }
}
