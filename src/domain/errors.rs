/// Application error. Kept flat: each variant names the layer concern that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    NetworkError(String),
    RenderingError(String),
    ValidationError(String),
    ParseError(String),
}

impl AppError {
    /// Errors the user can clear by trying again (network hiccup, unmeasured canvas).
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::NetworkError(_) | AppError::RenderingError(_))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network Error: {}", msg),
            AppError::RenderingError(msg) => write!(f, "Rendering Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type NetworkResult<T> = Result<T, AppError>;
pub type RenderingResult<T> = Result<T, AppError>;
