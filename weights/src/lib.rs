//! Numeric core of PLS path modeling: data tables, path matrices, scale
//! transforms and the iterative outer weights calculator.

pub mod calculator;
pub mod error;
pub mod inner;
mod linalg;
pub mod outer;
pub mod path;
pub mod scale;
pub mod table;
pub mod treat;
pub mod types;

pub use calculator::{PlsCalculator, WeightsCalculator};
pub use error::{PlsError, Result};
pub use linalg::{ols, r_squared};
pub use path::PathMatrix;
pub use scale::{Scale, ScaleContext};
pub use table::DataTable;
pub use types::*;
