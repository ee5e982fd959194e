use thiserror::Error;

/// Validation and contract errors exposed by `nutrifetch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("food name cannot be empty")]
    EmptyFoodName,
    #[error("record name cannot be empty")]
    EmptyRecordName,

    #[error(
        "invalid source '{value}', expected one of calorieninjas, usda, openfoodfacts"
    )]
    InvalidSource { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}
