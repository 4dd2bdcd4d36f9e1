use anyhow::anyhow;
use shelfwise_core::AppError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FineError {
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Fine policy must contain at least one tier")]
    NoTiers,

    #[error("First fine tier must start at day 1, found {0}")]
    FirstTierStart(i64),

    #[error("Fine tier {index} ends before it starts ({start}-{end})")]
    InvertedTier { index: usize, start: i64, end: i64 },

    #[error("Fine tier {index} starts at {start}, expected {expected}")]
    Gap {
        index: usize,
        start: i64,
        expected: i64,
    },

    #[error("Only the last fine tier may be open-ended (tier {0} has no end)")]
    UnboundedBeforeLast(usize),

    #[error("Last fine tier must be open-ended")]
    BoundedLastTier,

    #[error("Fine tier {0} has a negative rate")]
    NegativeRate(usize),

    #[error("Fine tier {0} has a rate above the maximum fine")]
    ExcessiveRate(usize),

    #[error("Invalid fine tier specification '{0}'")]
    Malformed(String),
}

impl From<FineError> for AppError {
    fn from(err: FineError) -> Self {
        AppError::bad_request(anyhow!(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwise_core::ErrorKind;

    #[test]
    fn test_invalid_timestamp_is_bad_request() {
        let err = AppError::from(FineError::InvalidTimestamp {
            value: "soon".into(),
            reason: "input contains invalid characters".into(),
        });

        assert!(err.is(ErrorKind::ValidationError));
        assert_eq!(err.status.as_u16(), 400);
        assert!(err.error.to_string().starts_with("Invalid timestamp 'soon'"));
    }
}
