pub type MuxResult<T> = Result<T, MuxError>;

#[derive(thiserror::Error, Debug)]
pub enum MuxError {
    #[error("truncated input: {0}")]
    Truncated(String),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("capacity error: {0}")]
    Capacity(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("search error: {0}")]
    Search(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MuxError {
    pub fn truncated(msg: impl Into<String>) -> Self {
        Self::Truncated(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
