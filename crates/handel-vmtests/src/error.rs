//! Error types for fixture runs

use handel_evm::SpecError;
use thiserror::Error;

/// Fixture error type
#[derive(Error, Debug)]
pub enum TestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Hex decoding error
    #[error("Hex error: {0}")]
    Hex(String),

    /// Fixture content that cannot be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown fork name
    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),

    /// State collaborator fault while seeding or inspecting
    #[error("State error: {0}")]
    State(#[from] handel_state::StateError),

    /// Expectation not met
    #[error("Assertion failed: {0}")]
    Assertion(String),
}

impl From<hex::FromHexError> for TestError {
    fn from(e: hex::FromHexError) -> Self {
        TestError::Hex(e.to_string())
    }
}

/// Fixture result type
pub type TestResult<T> = Result<T, TestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TestError::Assertion("gas mismatch".to_string());
        assert_eq!(err.to_string(), "Assertion failed: gas mismatch");

        let err: TestError = SpecError::UnknownFork("paris".to_string()).into();
        assert_eq!(err.to_string(), "Spec error: unknown fork: paris");

        let err: TestError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, TestError::Hex(_)));
    }
}
