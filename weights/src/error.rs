use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlsError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("numerical error: {0}")]
    Numerical(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<ndarray_linalg::error::LinalgError> for PlsError {
    fn from(err: ndarray_linalg::error::LinalgError) -> Self {
        PlsError::Numerical(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlsError>;
