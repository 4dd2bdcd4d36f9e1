use shelfwise_fines::PolicyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid fine policy: {0}")]
    Policy(#[from] PolicyError),
}
