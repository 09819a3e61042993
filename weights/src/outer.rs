use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{PlsError, Result};
use crate::linalg::ols;
use crate::treat::sample_sd;
use crate::types::Mode;

/// Raw outer weights of one block given its inner estimate `z`.
pub fn outer_weights(mode: Mode, x: &Array2<f64>, z: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    match mode {
        Mode::A => {
            let n = x.nrows() as f64;
            Ok(x.t().dot(&z) / n)
        }
        Mode::B => ols(x, z),
    }
}

/// Rescales `w` so that `x.dot(w)` has unit sample variance.
pub fn normalize_weights(x: &Array2<f64>, w: Array1<f64>) -> Result<Array1<f64>> {
    let sd = sample_sd(x.dot(&w).view());
    if !sd.is_finite() || sd <= f64::EPSILON {
        return Err(PlsError::Numerical(
            "outer estimate has zero variance".to_string(),
        ));
    }
    Ok(w / sd)
}
