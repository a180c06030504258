use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::{options::GoodiesOptions, FetchGoodiesError};

/// Decides whether a failed attempt may be retried.
pub type RetryCondition = Arc<dyn Fn(&RetryEvent<'_>) -> bool + Send + Sync>;

/// Failed-attempt snapshot handed to a [`RetryCondition`].
pub struct RetryEvent<'a> {
    /// The failure: a transport error, or the status-considered-error marker.
    pub error: &'a FetchGoodiesError,
    /// The fetched response when the attempt produced one, even if its
    /// status was classified as an error; `None` when the transport threw.
    pub response: Option<&'a reqwest::Response>,
    /// Attempts remaining after this failure was counted.
    pub retry_count: u32,
}

/// Inter-attempt delay: fixed, or computed from the attempts remaining.
#[derive(Clone)]
pub enum RetryDelay {
    Fixed(Duration),
    Computed(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl RetryDelay {
    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed(delay)
    }

    pub fn computed(delay: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(delay))
    }

    /// Computed delays are invoked fresh before every wait.
    pub(crate) fn duration_for(&self, remaining: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Computed(delay) => delay(remaining),
        }
    }
}

impl From<Duration> for RetryDelay {
    fn from(delay: Duration) -> Self {
        Self::Fixed(delay)
    }
}

impl fmt::Debug for RetryDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// Object-form retry override; unset fields fall back to the configured defaults.
#[derive(Clone, Default)]
pub struct RetryParameters {
    pub count: Option<u32>,
    pub delay: Option<RetryDelay>,
    /// Condition consulted after every failure; unset means always retry.
    pub on: Option<RetryCondition>,
}

impl RetryParameters {
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_delay(mut self, delay: impl Into<RetryDelay>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn with_condition(
        mut self,
        on: impl Fn(&RetryEvent<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.on = Some(Arc::new(on));
        self
    }
}

impl fmt::Debug for RetryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryParameters")
            .field("count", &self.count)
            .field("delay", &self.delay)
            .field("on", &self.on.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Per-call retry selection.
#[derive(Clone, Debug, Default)]
pub enum RetryOptions {
    /// Use the configured defaults.
    #[default]
    Default,
    /// Exactly one attempt, no waiting.
    Disabled,
    /// Exact attempt count with the default delay and no condition.
    Count(u32),
    /// Full override; see [`RetryParameters`].
    Policy(RetryParameters),
}

impl RetryOptions {
    /// Resolves the call's effective policy from the configured defaults.
    ///
    /// A count of zero is clamped to one attempt.
    pub(crate) fn resolve(self, defaults: &GoodiesOptions) -> ResolvedRetry {
        let default_delay = RetryDelay::Fixed(defaults.retry_delay);
        let resolved = match self {
            Self::Default => ResolvedRetry {
                count: defaults.retry_count,
                delay: default_delay,
                on: None,
            },
            Self::Disabled => ResolvedRetry {
                count: 1,
                delay: default_delay,
                on: None,
            },
            Self::Count(count) => ResolvedRetry {
                count,
                delay: default_delay,
                on: None,
            },
            Self::Policy(parameters) => ResolvedRetry {
                count: parameters.count.unwrap_or(defaults.retry_count),
                delay: parameters.delay.unwrap_or(default_delay),
                on: parameters.on,
            },
        };
        ResolvedRetry {
            count: resolved.count.max(1),
            ..resolved
        }
    }
}

/// The policy one call's retry loop runs under.
pub(crate) struct ResolvedRetry {
    pub(crate) count: u32,
    pub(crate) delay: RetryDelay,
    pub(crate) on: Option<RetryCondition>,
}

impl ResolvedRetry {
    pub(crate) fn should_retry(&self, event: &RetryEvent<'_>) -> bool {
        match &self.on {
            Some(condition) => condition(event),
            None => true,
        }
    }
}
