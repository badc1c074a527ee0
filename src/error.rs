use thiserror::Error;

/// Everything that can go wrong between issuing a request and holding normalized records.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network failure (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("request failed with HTTP {0}")]
    Status(u16),
    /// The body was not the JSON array of country records we expect.
    #[error("could not parse response: {0}")]
    Parse(String),
    /// The detail query matched nothing.
    #[error("no country found matching \"{0}\"")]
    NotFound(String),
}

impl DataError {
    /// True for the failures a retry may fix (network errors and 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            DataError::Transport(_) => true,
            DataError::Status(code) => *code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => DataError::Status(status.as_u16()),
            None => DataError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(e: serde_json::Error) -> Self {
        DataError::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
