use thiserror::Error;

pub type Result<T> = std::result::Result<T, MortgageError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MortgageError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },
}

impl MortgageError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        MortgageError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
