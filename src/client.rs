use std::fmt;

use reqwest::Method;
use tokio::time::sleep;

use crate::{
    request::{apply_url_prefix, Input, RequestOptions, RequestParts},
    response::{materialize, GoodiesResponse},
    retry::{ResolvedRetry, RetryEvent},
    transport::Transport,
    FetchGoodiesError, GoodiesOptions, Result,
};

/// Retrying executor wrapped around a [`Transport`].
///
/// Configured once via [`GoodiesOptions`]; every call resolves its own
/// retry policy and owns its loop state, so concurrent calls against the
/// same executor share nothing but the read-only configuration.
pub struct FetchGoodies<T = reqwest::Client> {
    transport: T,
    options: GoodiesOptions,
}

impl<T> fmt::Debug for FetchGoodies<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchGoodies")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FetchGoodies<reqwest::Client> {
    /// Creates an executor over a fresh `reqwest::Client`.
    pub fn new() -> Self {
        Self::with_transport(reqwest::Client::new())
    }
}

impl Default for FetchGoodies<reqwest::Client> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> FetchGoodies<T> {
    /// Creates an executor over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            options: GoodiesOptions::default(),
        }
    }

    /// Applies executor options such as the URL prefix and retry defaults.
    pub fn with_options(mut self, options: GoodiesOptions) -> Self {
        self.options = options;
        self
    }

    /// Performs a request with retries and returns the buffered response.
    pub async fn fetch(
        &self,
        input: impl Into<Input>,
        options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        let input = apply_url_prefix(self.options.url_prefix.as_deref(), input.into())?;
        let (parts, retry) = options.into_parts();
        let policy = retry.resolve(&self.options);
        let response = self.run_with_retry(&input, &parts, policy).await?;
        materialize(response, self.options.force_parse_json).await
    }

    /// The retry loop: attempt, classify, decide, wait, repeat.
    ///
    /// The descriptor is replayed verbatim on every attempt. Exhaustion is
    /// checked before the retry condition; a veto fails immediately without
    /// waiting. The inter-attempt sleep is the only suspension point.
    async fn run_with_retry(
        &self,
        input: &Input,
        parts: &RequestParts,
        policy: ResolvedRetry,
    ) -> Result<reqwest::Response> {
        let mut remaining = policy.count;
        loop {
            let attempt = self.transport.send(input.clone(), parts.clone()).await;
            let (failure, response) = match attempt {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if self.options.success.is_success(status) {
                        return Ok(response);
                    }
                    (FetchGoodiesError::HttpStatus { status }, Some(response))
                }
                Err(error) => (FetchGoodiesError::Transport(error), None),
            };

            remaining -= 1;
            let message = failure.attempt_message();
            if remaining == 0 {
                return Err(FetchGoodiesError::NoMoreRetries { message });
            }

            let event = RetryEvent {
                error: &failure,
                response: response.as_ref(),
                retry_count: remaining,
            };
            if !policy.should_retry(&event) {
                return Err(FetchGoodiesError::RetryConditionNotMet { message });
            }

            let delay = policy.delay.duration_for(remaining);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "attempt failed, retrying in {} ms, {} attempts left",
                delay.as_millis(),
                remaining
            );
            sleep(delay).await;
        }
    }

    /// Performs a GET request; any caller-supplied body is dropped.
    pub async fn get(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::GET);
        options.body = None;
        self.fetch(input, options).await
    }

    /// Performs a HEAD request; any caller-supplied body is dropped.
    pub async fn head(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::HEAD);
        options.body = None;
        self.fetch(input, options).await
    }

    /// Performs a POST request, passing the body through.
    pub async fn post(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::POST);
        self.fetch(input, options).await
    }

    /// Performs a PUT request, passing the body through.
    pub async fn put(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::PUT);
        self.fetch(input, options).await
    }

    /// Performs a DELETE request; any caller-supplied body is dropped.
    pub async fn delete(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::DELETE);
        options.body = None;
        self.fetch(input, options).await
    }

    /// Performs a CONNECT request; any caller-supplied body is dropped.
    pub async fn connect(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::CONNECT);
        options.body = None;
        self.fetch(input, options).await
    }

    /// Performs an OPTIONS request; any caller-supplied body is dropped.
    pub async fn options(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::OPTIONS);
        options.body = None;
        self.fetch(input, options).await
    }

    /// Performs a TRACE request; any caller-supplied body is dropped.
    pub async fn trace(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::TRACE);
        options.body = None;
        self.fetch(input, options).await
    }

    /// Performs a PATCH request; any caller-supplied body is dropped.
    pub async fn patch(
        &self,
        input: impl Into<Input>,
        mut options: RequestOptions,
    ) -> Result<GoodiesResponse> {
        options.method = Some(Method::PATCH);
        options.body = None;
        self.fetch(input, options).await
    }
}
