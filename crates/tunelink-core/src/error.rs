use thiserror::Error;

#[derive(Debug, Error)]
pub enum TunelinkError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("discord error: {0}")]
    Discord(String),
}

pub type TunelinkResult<T> = Result<T, TunelinkError>;
