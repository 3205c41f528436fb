use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("STT error: {0}")]
    Stt(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The speech backend failed in a way re-prompting cannot fix
    #[error("speech service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("no usable answer after {0} attempts")]
    RetriesExhausted(u32),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single recognition attempt produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("speech was not recognized")]
    Unrecognized,

    #[error("no speech before the timeout")]
    Timeout,

    #[error("speech service failure: {0}")]
    Service(String),
}

impl RecognitionError {
    /// Misses are worth another prompt; service failures are not
    pub fn is_retryable(&self) -> bool {
        matches!(self, RecognitionError::Unrecognized | RecognitionError::Timeout)
    }
}
