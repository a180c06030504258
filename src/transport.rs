use std::future::Future;

use reqwest::Method;

use crate::request::{Input, RequestParts};

/// Error type a transport may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of one transport invocation.
pub type TransportResult = std::result::Result<reqwest::Response, BoxError>;

/// The injected request function the executor decorates.
///
/// Implemented for `reqwest::Client` and for any
/// `Fn(Input, RequestParts) -> Future` closure, which is the usual way to
/// drive the executor in tests.
pub trait Transport: Send + Sync {
    /// Performs one request attempt for the given descriptor.
    fn send(
        &self,
        input: Input,
        parts: RequestParts,
    ) -> impl Future<Output = TransportResult> + Send;
}

impl<F, Fut> Transport for F
where
    F: Fn(Input, RequestParts) -> Fut + Send + Sync,
    Fut: Future<Output = TransportResult> + Send,
{
    fn send(
        &self,
        input: Input,
        parts: RequestParts,
    ) -> impl Future<Output = TransportResult> + Send {
        self(input, parts)
    }
}

impl Transport for reqwest::Client {
    async fn send(&self, input: Input, parts: RequestParts) -> TransportResult {
        let method = parts.method.unwrap_or(Method::GET);
        let mut request = match input {
            Input::Text(url) => self.request(method, url),
            Input::Url(url) => self.request(method, url),
        };
        request = request.headers(parts.headers);
        if let Some(timeout) = parts.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = parts.body {
            request = request.body(body);
        }
        let response = request
            .send()
            .await
            .map_err(|error| Box::new(error) as BoxError)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::{Transport, TransportResult};
    use crate::request::{Input, RequestParts};

    async fn send_through<T: Transport>(transport: &T) -> TransportResult {
        transport
            .send(Input::Text("https://example.com".to_owned()), RequestParts::default())
            .await
    }

    #[tokio::test]
    async fn closures_implement_transport() {
        let transport = |_input: Input, _parts: RequestParts| async {
            let result: TransportResult = Err("offline".into());
            result
        };
        let err = send_through(&transport).await.expect_err("must fail");
        assert_eq!(err.to_string(), "offline");
    }
}
