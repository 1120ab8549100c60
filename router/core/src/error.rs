//! Router Errors

use thiserror::Error;

/// Errors returned by routing operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// Caller supplied input the router cannot act on
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RouterError {
    /// Selection was asked to choose from an empty candidate list
    #[must_use]
    pub fn no_candidates() -> Self {
        Self::InvalidInput("no candidates supplied".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RouterError::no_candidates().to_string(),
            "Invalid input: no candidates supplied"
        );
        assert_eq!(
            RouterError::InvalidInput("window size must be positive".into()).to_string(),
            "Invalid input: window size must be positive"
        );
    }
}
