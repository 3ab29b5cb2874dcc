use thiserror::Error;

#[derive(Debug, Error)]
pub enum FxError {
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),
}
