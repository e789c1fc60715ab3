use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid population {0}: must be a non-negative integer")]
    InvalidPopulation(i64),

    #[error("invalid acceptance rate {0}: must be a number")]
    InvalidAcceptanceRate(f64),

    #[error("invalid route template: {0}")]
    InvalidTemplate(String),

    #[error("route template parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
