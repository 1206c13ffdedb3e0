use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}

pub type ScreenResult<T> = Result<T, ScreenError>;
