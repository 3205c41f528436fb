use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to write session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize records: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid marketplace URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
