use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] rquest::Error),

    #[error("HTTP status {status}")]
    HttpStatus { status: StatusCode },

    #[error("Page parse error: {0}")]
    PageParse(String),

    #[error("Retry budget exhausted after {attempts} attempts: {last_error}")]
    FetchExhausted {
        attempts: u32,
        last_error: Box<Error>,
    },

    #[error("Could not extract a feature id from URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Whether another attempt against the same page could plausibly succeed.
    /// Permanent rejections (bad request, auth/proxy failures) surface
    /// immediately instead of burning the retry budget.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::PageParse(_) => true,
            Error::HttpStatus { status } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}
