use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1};
use tracing::{debug, trace, warn};

use crate::error::{PlsError, Result};
use crate::inner::inner_estimates;
use crate::outer::{normalize_weights, outer_weights};
use crate::path::PathMatrix;
use crate::scale::ScaleContext;
use crate::table::DataTable;
use crate::treat::{correction, standardize};
use crate::types::{Block, OuterWeights, Scheme, WeightsOutput, blocks_are_metric};

pub trait WeightsCalculator {
    /// Estimates outer weights and LV scores for every node of `path`, using
    /// the matching entry of `blocks` as that node's outer model.
    fn calculate(
        &self,
        blocks: &[Block],
        data: &DataTable,
        path: &PathMatrix,
    ) -> Result<WeightsOutput>;
}

/// Iterative PLS weights estimation.
#[derive(Debug, Clone)]
pub struct PlsCalculator {
    pub scheme: Scheme,
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for PlsCalculator {
    fn default() -> Self {
        Self {
            scheme: Scheme::Centroid,
            tolerance: 1e-7,
            max_iter: 100,
        }
    }
}

impl PlsCalculator {
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

impl WeightsCalculator for PlsCalculator {
    fn calculate(
        &self,
        blocks: &[Block],
        data: &DataTable,
        path: &PathMatrix,
    ) -> Result<WeightsOutput> {
        calculate_internal(self, blocks, data, path)
    }
}

fn calculate_internal(
    calc: &PlsCalculator,
    blocks: &[Block],
    data: &DataTable,
    path: &PathMatrix,
) -> Result<WeightsOutput> {
    let blocks = order_blocks(blocks, path)?;
    let n = data.nrows();
    if n < 2 {
        return Err(PlsError::Numerical(format!(
            "at least two observations are required, got {n}"
        )));
    }
    let metric = blocks_are_metric(blocks.iter().copied());

    for (j, block) in blocks.iter().enumerate() {
        if (0..path.len()).all(|k| !path.connected(j, k)) {
            warn!("latent variable {} has no structural neighbours", block.lv);
        }
    }

    let mut x = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let table = data.select(&block.mv_names())?;
        let values = if metric {
            table.values().clone()
        } else {
            standardized_columns(table.values())?
        };
        x.push(values);
    }

    let mut w = Vec::with_capacity(blocks.len());
    for xj in &x {
        w.push(normalize_weights(xj, Array1::ones(xj.ncols()))?);
    }
    let mut y = outer_estimates(&x, &w, n);

    let mut iterations = 0;
    let mut converged = false;
    while iterations < calc.max_iter {
        iterations += 1;
        let z = inner_estimates(calc.scheme, path, &y)?;

        if !metric {
            let context = GroupedInner {
                data,
                path,
                z: &z,
                correction: correction(n),
            };
            for (j, block) in blocks.iter().enumerate() {
                for (col, mv) in block.mvs.iter().enumerate() {
                    if let Some(scale) = mv.scale {
                        let quantified = scale.scale(&block.lv, &mv.name, &context)?;
                        x[j].column_mut(col).assign(&quantified);
                    }
                }
            }
        }

        let mut delta = 0.0_f64;
        for (j, block) in blocks.iter().enumerate() {
            let raw = outer_weights(block.mode, &x[j], z.column(j))?;
            let updated = normalize_weights(&x[j], raw)?;
            for (old, new) in w[j].iter().zip(updated.iter()) {
                delta = delta.max((old - new).abs());
            }
            w[j] = updated;
        }
        y = outer_estimates(&x, &w, n);
        trace!(iteration = iterations, delta, "outer weights updated");

        if delta < calc.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(PlsError::Numerical(format!(
            "weights did not converge after {} iterations",
            calc.max_iter
        )));
    }
    debug!(
        iterations,
        scheme = %calc.scheme,
        metric,
        "weights converged"
    );

    let mut final_data = DataTable::with_rows(n);
    let mut scores = DataTable::with_rows(n);
    let mut weights = OuterWeights::default();
    for (j, block) in blocks.iter().enumerate() {
        for (col, mv) in block.mvs.iter().enumerate() {
            final_data.set_column(mv.name.clone(), x[j].column(col).to_owned())?;
            weights.push(&block.lv, &mv.name, w[j][col]);
        }
        scores.set_column(block.lv.clone(), y.column(j).to_owned())?;
    }

    Ok(WeightsOutput {
        final_data,
        scores,
        weights,
        iterations,
    })
}

/// Blocks in path order; every path node needs a block with at least one MV.
fn order_blocks<'a>(blocks: &'a [Block], path: &PathMatrix) -> Result<Vec<&'a Block>> {
    let by_lv: HashMap<&str, &Block> = blocks.iter().map(|b| (b.lv.as_str(), b)).collect();
    let mut ordered = Vec::with_capacity(path.len());
    for name in path.names() {
        let block = by_lv.get(name.as_str()).ok_or_else(|| {
            PlsError::Configuration(format!("latent variable {name} has no outer model"))
        })?;
        if block.mvs.is_empty() {
            return Err(PlsError::Configuration(format!(
                "latent variable {name} has no manifest variables"
            )));
        }
        ordered.push(*block);
    }
    Ok(ordered)
}

/// Columns with zero mean and unit population variance, the convention of
/// quantified MVs.
fn standardized_columns(values: &Array2<f64>) -> Result<Array2<f64>> {
    let mut out = values.clone();
    let factor = correction(values.nrows());
    for mut column in out.columns_mut() {
        let treated = standardize(column.view())? * factor;
        column.assign(&treated);
    }
    Ok(out)
}

fn outer_estimates(x: &[Array2<f64>], w: &[Array1<f64>], n: usize) -> Array2<f64> {
    let mut y = Array2::<f64>::zeros((n, x.len()));
    for (j, (xj, wj)) in x.iter().zip(w.iter()).enumerate() {
        y.column_mut(j).assign(&xj.dot(wj));
    }
    y
}

/// Groups each LV's inner estimate by the raw categories of its MVs.
struct GroupedInner<'a> {
    data: &'a DataTable,
    path: &'a PathMatrix,
    z: &'a Array2<f64>,
    correction: f64,
}

impl ScaleContext for GroupedInner<'_> {
    fn mv_grouped_by_lv(&self, lv: &str, mv: &str) -> Result<Array1<f64>> {
        let raw = self.data.require_column(mv)?;
        let z = self.z.column(self.path.require_index(lv)?);
        Ok(group_means(raw, z))
    }

    fn correction(&self) -> f64 {
        self.correction
    }
}

/// For each observation, the mean of `values` over all observations with the
/// same `keys` entry.
pub fn group_means(keys: ArrayView1<'_, f64>, values: ArrayView1<'_, f64>) -> Array1<f64> {
    let key_of = |v: f64| if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() };
    let mut sums: HashMap<u64, (f64, usize)> = HashMap::new();
    for (k, v) in keys.iter().zip(values.iter()) {
        let entry = sums.entry(key_of(*k)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    keys.iter()
        .map(|k| {
            let (sum, count) = sums[&key_of(*k)];
            sum / count as f64
        })
        .collect()
}
