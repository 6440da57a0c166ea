//! Errores de los adapters.

use flow_core::CoreEngineError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("loan amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("max_amount must be positive, got {0}")]
    NonPositiveMaxAmount(f64),
    #[error("credit score must be between 0 and 850, got {0}")]
    CreditScoreOutOfRange(u32),
    #[error("min_score must be between 0 and 850, got {0}")]
    MinScoreOutOfRange(u32),
    #[error("missing context key '{0}'")]
    MissingContextKey(String),
    #[error("invalid value for context key '{key}': {reason}")]
    InvalidContextValue { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid flow document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error reading flow document: {0}")]
    Io(#[from] std::io::Error),
    #[error("step id '{0}' declared twice")]
    DuplicateStep(String),
    #[error("transition references undeclared step '{0}'")]
    UnknownStep(String),
    #[error("start step '{0}' is not declared")]
    UnknownStart(String),
    #[error(transparent)]
    Registry(#[from] CoreEngineError),
}
