use ndarray::{Array1, Array2, ArrayView1};
use ndarray_linalg::Solve;

use crate::error::{PlsError, Result};

/// Least squares coefficients of `y` on the columns of `x` (no intercept).
pub fn ols(x: &Array2<f64>, y: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    if x.nrows() != y.len() {
        return Err(PlsError::Numerical(format!(
            "regression with {} rows but {} responses",
            x.nrows(),
            y.len()
        )));
    }
    let xtx = x.t().dot(x);
    let xty = x.t().dot(&y);
    let beta = xtx.solve_into(xty)?;
    if beta.iter().any(|v| !v.is_finite()) {
        return Err(PlsError::Numerical(
            "singular system in least squares".to_string(),
        ));
    }
    Ok(beta)
}

pub fn r_squared(x: &Array2<f64>, y: ArrayView1<'_, f64>, beta: &Array1<f64>) -> f64 {
    let fitted = x.dot(beta);
    let m = y.mean().unwrap_or(0.0);
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (obs, fit) in y.iter().zip(fitted.iter()) {
        ss_res += (obs - fit).powi(2);
        ss_tot += (obs - m).powi(2);
    }
    if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { f64::NAN }
}
