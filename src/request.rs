use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Method, Url,
};

use crate::{retry::RetryOptions, FetchGoodiesError};

/// Request target accepted by the executor.
///
/// Only the text form can be combined with a configured URL prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A URL (or, with a prefix configured, a path to append to it).
    Text(String),
    /// A pre-parsed URL, passed to the transport untouched.
    Url(Url),
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Url> for Input {
    fn from(value: Url) -> Self {
        Self::Url(value)
    }
}

/// Per-call request options.
///
/// `body` and `json` are mutually exclusive by contract; when both are set
/// the JSON payload wins and replaces the body.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// HTTP method; the transport defaults to GET when unset.
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// JSON payload; encoded into the body during normalization, defaulting
    /// the method to POST and the `Content-Type` to `application/json`.
    pub json: Option<serde_json::Value>,
    /// Retry behavior for this call; see [`RetryOptions`].
    pub retry: RetryOptions,
    /// Per-request timeout passed through to the transport.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Splits the options into the descriptor replayed on every attempt
    /// and the retry selection, applying the JSON-to-body shaping.
    pub(crate) fn into_parts(self) -> (RequestParts, RetryOptions) {
        let Self {
            method,
            headers,
            body,
            json,
            retry,
            timeout,
        } = self;

        let mut parts = RequestParts {
            method,
            headers,
            body,
            timeout,
        };

        if let Some(payload) = json {
            parts.method.get_or_insert(Method::POST);
            parts.body = Some(payload.to_string().into_bytes());
            // Caller-supplied Content-Type wins over the JSON default.
            if !parts.headers.contains_key(CONTENT_TYPE) {
                parts
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
        }

        (parts, retry)
    }
}

/// The normalized request descriptor handed to the transport.
///
/// Built once per call and resent verbatim on every retry attempt.
#[derive(Clone, Debug, Default)]
pub struct RequestParts {
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

/// Concatenates the configured prefix onto text inputs.
///
/// Fails for non-text inputs before any transport activity.
pub(crate) fn apply_url_prefix(
    prefix: Option<&str>,
    input: Input,
) -> Result<Input, FetchGoodiesError> {
    let Some(prefix) = prefix else {
        return Ok(input);
    };
    match input {
        Input::Text(path) => Ok(Input::Text(format!("{prefix}{path}"))),
        Input::Url(_) => Err(FetchGoodiesError::UrlPrefixNotSupported),
    }
}
