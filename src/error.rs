use thiserror::Error;

/// Main error type for the learning core
#[derive(Error, Debug)]
pub enum CvarqError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Policy errors
    #[error("Unimplemented policy: {0}")]
    UnimplementedPolicy(String),

    // Numerical divergence of the update rule
    #[error(
        "Quantile monotonicity violated at ({row}, {col}) action {action}: \
         v[0]={first} > v[{last_index}]={last}"
    )]
    MonotonicityViolation {
        row: usize,
        col: usize,
        action: usize,
        first: f64,
        last: f64,
        last_index: usize,
    },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CvarqError
pub type Result<T> = std::result::Result<T, CvarqError>;
