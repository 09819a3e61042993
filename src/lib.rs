//! Partial least squares path modeling with higher-order constructs.

pub mod config;
pub mod estimator;
pub mod inner_model;
pub mod logging;
pub mod parser;
pub mod structure;

pub use config::{Config, HigherOrder, LatentVariable};
pub use estimator::{Estimator, hoc_path_first_stage};
pub use inner_model::{InnerSummary, Loading, PathCoefficients, Plspm};
pub use plspm_weights::{
    Block, DataTable, Mode, MvSpec, OuterWeights, PathMatrix, PlsCalculator, PlsError, Result,
    Scale, Scheme, WeightsCalculator, WeightsOutput,
};
pub use structure::Structure;
