//! Correlation identifier for one HTTP request.
//!
//! The [`Trace`](crate::Trace) middleware installs a [`TraceId`] in tokio
//! task-local storage for the lifetime of the request, so
//! [`Error::new`](crate::domain::Error::new) and log spans can pick it up
//! without threading it through every call. Task-locals do not follow
//! `tokio::spawn`; wrap spawned work in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Header carrying the trace identifier, on requests and responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// UUID identifying one request in logs and error bodies.
///
/// # Examples
/// ```
/// use parking_backend::TraceId;
///
/// let incoming = TraceId::adopt_or_generate(Some("0f8fad5b-d9cb-469f-a165-70867728950e"));
/// assert_eq!(incoming.to_string(), "0f8fad5b-d9cb-469f-a165-70867728950e");
///
/// let fresh = TraceId::adopt_or_generate(Some("not a uuid"));
/// assert_ne!(fresh.to_string(), "not a uuid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// A fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied identifier when it is a UUID, otherwise
    /// generate one.
    #[must_use]
    pub fn adopt_or_generate(header: Option<&str>) -> Self {
        header
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
