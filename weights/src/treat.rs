use ndarray::{Array1, ArrayView1};

use crate::error::{PlsError, Result};

pub fn mean(column: ArrayView1<'_, f64>) -> f64 {
    column.mean().unwrap_or(f64::NAN)
}

/// Standard deviation with an `n - 1` denominator.
pub fn sample_sd(column: ArrayView1<'_, f64>) -> f64 {
    let n = column.len();
    if n < 2 {
        return f64::NAN;
    }
    column.std(1.0)
}

/// Centres and optionally scales a column to unit sample variance.
pub fn treat(column: ArrayView1<'_, f64>, center: bool, scale: bool) -> Result<Array1<f64>> {
    let mut out = column.to_owned();
    if center {
        let m = mean(column);
        out.mapv_inplace(|v| v - m);
    }
    if scale {
        let sd = sample_sd(column);
        if !sd.is_finite() || sd <= f64::EPSILON {
            return Err(PlsError::Numerical(
                "cannot scale a column with zero variance".to_string(),
            ));
        }
        out.mapv_inplace(|v| v / sd);
    }
    Ok(out)
}

pub fn standardize(column: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    treat(column, true, true)
}

/// Converts unit sample variance into unit population variance.
pub fn correction(nrows: usize) -> f64 {
    if nrows < 2 {
        return 1.0;
    }
    let n = nrows as f64;
    (n / (n - 1.0)).sqrt()
}

pub fn correlation(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let ma = mean(a);
    let mb = mean(b);
    let mut sab = 0.0;
    let mut saa = 0.0;
    let mut sbb = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - ma;
        let dy = y - mb;
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }
    let denom = (saa * sbb).sqrt();
    if denom != 0.0 { sab / denom } else { 0.0 }
}
