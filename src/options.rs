use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Attempt count used when neither the configuration nor the call says otherwise.
pub const DEFAULT_RETRY_COUNT: u32 = 3;
/// Inter-attempt delay used when neither the configuration nor the call says otherwise.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Classifies a response status code as success or error.
#[derive(Clone)]
pub enum SuccessPolicy {
    /// Explicit list of successful codes; everything else is an error.
    Codes(Vec<u16>),
    /// Predicate returning `true` for successful codes.
    Predicate(Arc<dyn Fn(u16) -> bool + Send + Sync>),
}

impl SuccessPolicy {
    /// Builds a policy from an explicit code list.
    pub fn codes(codes: impl Into<Vec<u16>>) -> Self {
        Self::Codes(codes.into())
    }

    /// Builds a policy from a predicate.
    pub fn predicate(predicate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn is_success(&self, status: u16) -> bool {
        match self {
            Self::Codes(codes) => codes.contains(&status),
            Self::Predicate(predicate) => predicate(status),
        }
    }
}

impl Default for SuccessPolicy {
    /// 2xx statuses are successful.
    fn default() -> Self {
        Self::predicate(|status| (200..300).contains(&status))
    }
}

impl fmt::Debug for SuccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codes(codes) => f.debug_tuple("Codes").field(codes).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// Configures prefixing, status classification, retry defaults and JSON parsing.
#[derive(Clone, Debug)]
pub struct GoodiesOptions {
    /// Prepended to text inputs before the transport is called.
    ///
    /// Only text inputs can be prefixed; a pre-parsed URL input fails with
    /// [`FetchGoodiesError::UrlPrefixNotSupported`](crate::FetchGoodiesError::UrlPrefixNotSupported).
    pub url_prefix: Option<String>,
    /// Status classification; defaults to 2xx-is-success.
    pub success: SuccessPolicy,
    /// Default attempt count for calls that don't override it.
    pub retry_count: u32,
    /// Default inter-attempt delay for calls that don't override it.
    pub retry_delay: Duration,
    /// Parse the body as JSON even without a JSON `Content-Type` header.
    pub force_parse_json: bool,
}

impl Default for GoodiesOptions {
    fn default() -> Self {
        Self {
            url_prefix: None,
            success: SuccessPolicy::default(),
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            force_parse_json: false,
        }
    }
}
