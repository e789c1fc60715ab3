use thiserror::Error;

/// Every variant is an `InvalidPolicy` condition: the sweep refuses to start.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("invalid policy: unknown kind {0:?} (expected constant, linear, logistic or utility)")]
    UnknownKind(String),

    #[error("invalid policy: {kind} policy requires parameter `{param}`")]
    MissingParameter {
        kind:  &'static str,
        param: &'static str,
    },

    #[error("invalid policy: parameter `{param}` must be finite, got {value}")]
    NonFinite {
        param: String,
        value: f64,
    },

    #[error("invalid policy: id {0:?} must be non-empty and contain only letters, digits, '-', '_' or '.'")]
    InvalidId(String),

    #[error("invalid policy: unknown utility attribute {0:?} (expected time, cost or pollution)")]
    UnknownAttribute(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
