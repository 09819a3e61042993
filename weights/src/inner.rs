use ndarray::{Array1, Array2, Axis};
use tracing::trace;

use crate::error::Result;
use crate::linalg::ols;
use crate::path::PathMatrix;
use crate::treat::{correlation, standardize};
use crate::types::Scheme;

/// Inner weight matrix `e[[k, j]]`: contribution of LV `k` to the inner
/// estimate of LV `j`. Columns of `y` follow the path matrix order.
pub fn inner_weights(scheme: Scheme, path: &PathMatrix, y: &Array2<f64>) -> Result<Array2<f64>> {
    let n_lv = path.len();
    let mut e = Array2::<f64>::zeros((n_lv, n_lv));
    for j in 0..n_lv {
        match scheme {
            Scheme::Centroid | Scheme::Factorial => {
                for k in 0..n_lv {
                    if k == j || !path.connected(j, k) {
                        continue;
                    }
                    let cor = correlation(y.column(j), y.column(k));
                    e[[k, j]] = match scheme {
                        Scheme::Centroid => sign(cor),
                        _ => cor,
                    };
                }
            }
            Scheme::Path => {
                let predecessors: Vec<usize> =
                    (0..n_lv).filter(|k| path.values()[[*k, j]] == 1).collect();
                if !predecessors.is_empty() {
                    let x = y.select(Axis(1), &predecessors);
                    let beta = ols(&x, y.column(j))?;
                    for (k, b) in predecessors.iter().zip(beta.iter()) {
                        e[[*k, j]] = *b;
                    }
                }
                for k in 0..n_lv {
                    if path.values()[[j, k]] == 1 {
                        e[[k, j]] = correlation(y.column(j), y.column(k));
                    }
                }
            }
        }
    }
    trace!(?e, "inner weights");
    Ok(e)
}

/// Standardized inner estimates. An LV with no structural neighbour keeps its
/// outer estimate.
pub fn inner_estimates(scheme: Scheme, path: &PathMatrix, y: &Array2<f64>) -> Result<Array2<f64>> {
    let e = inner_weights(scheme, path, y)?;
    let mut z = Array2::<f64>::zeros(y.raw_dim());
    for j in 0..path.len() {
        let column: Array1<f64> = if e.column(j).iter().all(|v| *v == 0.0) {
            y.column(j).to_owned()
        } else {
            standardize(y.dot(&e.column(j)).view())?
        };
        z.column_mut(j).assign(&column);
    }
    Ok(z)
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
