use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("JSON parse error on log line {line}: {source}")]
    MalformedRecord {
        line: usize,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReplayError>;
