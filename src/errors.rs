use thiserror::Error;

/// The only failure a page fetch surfaces. It carries a human readable
/// message and nothing else; callers decide how to present and retry it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.message
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
