use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    StatusCode, Url,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FetchGoodiesError, Result};

/// A fully-buffered response.
///
/// The body is read from the transport exactly once; [`text`](Self::text)
/// and [`json`](Self::json) return the already-materialized values.
#[derive(Debug)]
pub struct GoodiesResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    text: String,
    json: Option<Value>,
}

/// Buffers the successful response and resolves its JSON exposure.
///
/// JSON is parsed when forced by configuration or when the `Content-Type`
/// value contains `application/json`; otherwise the accessor stays `None`
/// even for bodies that happen to look like JSON.
pub(crate) async fn materialize(
    response: reqwest::Response,
    force_parse_json: bool,
) -> Result<GoodiesResponse> {
    let status = response.status();
    let headers = response.headers().clone();
    let url = response.url().clone();
    let text = response
        .text()
        .await
        .map_err(|error| FetchGoodiesError::Transport(error.into()))?;

    let declares_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    let json = if force_parse_json || declares_json {
        Some(serde_json::from_str(&text)?)
    } else {
        None
    };

    Ok(GoodiesResponse {
        status,
        headers,
        url,
        text,
        json,
    })
}

impl GoodiesResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is in the 2xx range, as reported by the transport.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL of the response.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The buffered body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed body, or `None` when the response was not exposed as JSON.
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Deserializes the parsed JSON body into `T`.
    ///
    /// `Ok(None)` when the response was not exposed as JSON.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.json
            .as_ref()
            .map(|value| T::deserialize(value).map_err(FetchGoodiesError::Json))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::materialize;
    use crate::FetchGoodiesError;

    fn response(content_type: Option<&str>, body: &str) -> reqwest::Response {
        let mut builder = http::Response::builder().status(200);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        reqwest::Response::from(builder.body(body.to_owned()).expect("valid response"))
    }

    #[tokio::test]
    async fn text_is_available_without_json_exposure() {
        let materialized = materialize(response(None, "plain text"), false)
            .await
            .expect("must materialize");
        assert_eq!(materialized.text(), "plain text");
        assert!(materialized.json().is_none());
    }

    #[tokio::test]
    async fn declared_json_is_parsed_and_text_preserved() {
        let materialized = materialize(
            response(Some("application/json"), r#"{"key":"value"}"#),
            false,
        )
        .await
        .expect("must materialize");

        assert_eq!(materialized.json(), Some(&json!({"key": "value"})));
        assert_eq!(materialized.text(), r#"{"key":"value"}"#);
    }

    #[tokio::test]
    async fn json_looking_body_stays_unparsed_without_the_header() {
        let materialized = materialize(response(None, r#"{"key":"value"}"#), false)
            .await
            .expect("must materialize");
        assert!(materialized.json().is_none());
        assert_eq!(materialized.text(), r#"{"key":"value"}"#);
    }

    #[tokio::test]
    async fn force_parse_json_parses_unlabeled_bodies() {
        let materialized = materialize(response(None, r#"{"key":"value"}"#), true)
            .await
            .expect("must materialize");
        assert_eq!(materialized.json(), Some(&json!({"key": "value"})));
    }

    #[tokio::test]
    async fn invalid_declared_json_is_a_parse_error() {
        let err = materialize(response(Some("application/json"), "not json"), false)
            .await
            .expect_err("must fail");
        assert!(matches!(err, FetchGoodiesError::Json(_)));
    }

    #[tokio::test]
    async fn charset_suffix_still_counts_as_json() {
        let materialized = materialize(
            response(Some("application/json; charset=utf-8"), "[1,2]"),
            false,
        )
        .await
        .expect("must materialize");
        assert_eq!(materialized.json(), Some(&json!([1, 2])));
    }

    #[tokio::test]
    async fn json_as_deserializes_the_parsed_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Payload {
            key: String,
        }

        let materialized = materialize(
            response(Some("application/json"), r#"{"key":"value"}"#),
            false,
        )
        .await
        .expect("must materialize");

        let payload: Option<Payload> = materialized.json_as().expect("must deserialize");
        assert_eq!(
            payload,
            Some(Payload {
                key: "value".to_owned()
            })
        );

        let unparsed = materialize(response(None, "text"), false)
            .await
            .expect("must materialize");
        let missing: Option<Payload> = unparsed.json_as().expect("must be none");
        assert!(missing.is_none());
    }
}
