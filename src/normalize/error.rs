use thiserror::Error;

/// Why a single player record could not be normalized
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("counter {category}.{key} is not numeric (found {found})")]
    InvalidCounterValue {
        category: String,
        key: String,
        found: &'static str,
    },

    #[error("category {category} is not a counter mapping (found {found})")]
    InvalidCategory {
        category: String,
        found: &'static str,
    },

    #[error("player record is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}
