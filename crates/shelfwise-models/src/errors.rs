use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("Copy counts must satisfy 0 <= available ({available}) <= total ({total})")]
    InvalidCopies { available: i32, total: i32 },

    #[error("Unknown transaction status '{0}'")]
    UnknownStatus(String),

    #[error("Transaction {0} is returned but has no return date")]
    MissingReturnDate(String),

    #[error("Transaction {0} is still issued but has a return date")]
    UnexpectedReturnDate(String),

    #[error("Transaction {0} has a negative fine")]
    NegativeFine(String),
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Blank(field));
    }
    Ok(())
}
