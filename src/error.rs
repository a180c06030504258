use crate::transport::BoxError;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchGoodiesError {
    /// A URL prefix is configured but the input was not plain text.
    #[error("url prefix is only supported for text inputs")]
    UrlPrefixNotSupported,
    /// Network or request execution error from the transport.
    #[error("transport error: {0}")]
    Transport(BoxError),
    /// Response status classified as an error by the success policy.
    ///
    /// Only shapes the retry decision and the terminal failure message;
    /// never returned from `fetch` directly.
    #[error("http status {status} considered an error")]
    HttpStatus { status: u16 },
    /// The attempt counter reached zero.
    #[error("no more retries: {message}")]
    NoMoreRetries { message: String },
    /// The retry condition vetoed a further attempt.
    #[error("retry condition not met: {message}")]
    RetryConditionNotMet { message: String },
    /// Response body declared as JSON but failed to parse.
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchGoodiesError {
    /// Text a terminal retry failure embeds for the failing attempt.
    ///
    /// Transport errors render their own message; an error that renders
    /// nothing yields a fixed placeholder.
    pub(crate) fn attempt_message(&self) -> String {
        let message = match self {
            Self::Transport(error) => error.to_string(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            "Unknown error".to_owned()
        } else {
            message
        }
    }
}
