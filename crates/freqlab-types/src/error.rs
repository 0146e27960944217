use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreqError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Non-finite sample at row={row}, col={col}")]
    NonFiniteInput { row: usize, col: usize },

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FreqError {
    /// Dimension error for two grids that must agree.
    pub fn shape_mismatch(what: &str, expected: (usize, usize), found: (usize, usize)) -> Self {
        FreqError::InvalidDimensions(format!(
            "{what}: expected {}x{}, found {}x{}",
            expected.0, expected.1, found.0, found.1
        ))
    }
}

pub type FreqResult<T> = Result<T, FreqError>;
