use thiserror::Error;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    TransportError(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    StatusError { status: u16, url: String },
    #[error("invalid base url: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("base url cannot carry a path: {0}")]
    UrlNotABase(String),
}

impl BackendError {
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::StatusError {
            status,
            url: url.into(),
        }
    }
}
