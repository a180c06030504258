//! `fetch-goodies` decorates a pluggable HTTP transport with retries,
//! URL prefixing, JSON conveniences and configurable success codes.
//!
//! The entry points:
//! - [`FetchGoodies::fetch`]
//! - the method shortcuts ([`FetchGoodies::get`], [`FetchGoodies::post`], ...)
//!
//! The transport stays injectable: anything implementing [`Transport`]
//! works, and `reqwest::Client` does out of the box.

mod client;
mod error;
mod options;
mod request;
mod response;
mod retry;
mod transport;

pub use client::FetchGoodies;
pub use error::FetchGoodiesError;
pub use options::{GoodiesOptions, SuccessPolicy, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY};
pub use request::{Input, RequestOptions, RequestParts};
pub use response::GoodiesResponse;
pub use retry::{RetryCondition, RetryDelay, RetryEvent, RetryOptions, RetryParameters};
pub use transport::{BoxError, Transport, TransportResult};

pub type Result<T> = std::result::Result<T, FetchGoodiesError>;
