use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, PartialEq, Error)]
pub enum CommonError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("decode error: {0}")]
    DecodeError(String),

    #[error("unknown message type: {0}")]
    MethodError(String),

    #[error("json error: {0}")]
    JSONError(String),
}

pub trait ToValidate {
    fn validate(&self) -> Result<(), CommonError>;
}
