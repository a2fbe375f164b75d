use thiserror::Error;

/// Why a conversation request was rejected with 429.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitKind {
    /// The anonymous free-request quota is exhausted and the user must sign in.
    AnonymousQuota,
    /// Any other rate-limit reason; retry later.
    Other,
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("a request is already in flight")]
    Busy,

    #[error("rate limited: {message}")]
    RateLimited { kind: RateLimitKind, message: String },

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("stream reported an error: {0}")]
    Stream(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ChatError {
    /// True when the failure should prompt the user to authenticate rather
    /// than show a generic failure notice.
    pub fn needs_auth(&self) -> bool {
        matches!(
            self,
            ChatError::RateLimited {
                kind: RateLimitKind::AnonymousQuota,
                ..
            }
        )
    }
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PageError {
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
