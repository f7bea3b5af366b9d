//! Error types.
//!
//! - `FitError`: failures of the numerical core (construction and solve)
//! - `AppError`: a message plus process exit code, used by the CLI layer

/// Errors raised while building or reloading a polynomial fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// A degree is below 1, a degree list is empty, or a truncation falls
    /// outside the design matrix.
    #[error("invalid polynomial degree: {0}")]
    InvalidDegree(String),

    /// Sample counts, series counts or degree counts disagree.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The design matrix has fewer independent columns than coefficients.
    ///
    /// Usually there are too few distinct `x` values for the requested degree.
    #[error("design matrix is rank deficient (rank {rank} < {columns} columns)")]
    RankDeficient { rank: usize, columns: usize },

    /// The axis convention is neither `rows` nor `cols`.
    #[error("unsupported axis order '{0}' (expected 'rows' or 'cols')")]
    UnsupportedOrder(String),

    /// Input contains NaN or infinite values.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// No samples or no series were supplied.
    #[error("no data to fit: {0}")]
    EmptyInput(&'static str),

    /// The SVD did not converge within its iteration budget.
    #[error("least-squares solve did not converge after {max_iter} iterations")]
    NoConvergence { max_iter: usize },
}

/// Result alias for the numerical core.
pub type Result<T> = std::result::Result<T, FitError>;

/// Exit code used when the numerical core rejects the input.
pub const EXIT_FIT: u8 = 3;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(EXIT_FIT, format!("Fit failed: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_error_maps_to_fit_exit_code() {
        let app: AppError = FitError::RankDeficient { rank: 3, columns: 6 }.into();
        assert_eq!(app.exit_code(), EXIT_FIT);
        assert!(app.to_string().contains("rank 3 < 6"));
    }
}
