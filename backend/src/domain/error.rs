//! Error envelope returned by every inbound adapter.
//!
//! Flows fail with their own `thiserror` enums; adapters convert those into
//! an [`Error`] carrying a stable [`ErrorCode`], a user-facing message, the
//! request's trace id and optional structured details such as the offending
//! form field. Nothing here knows about HTTP.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Failure category, serialised in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or a blank required field.
    InvalidRequest,
    /// No signed-in staff member, or wrong credentials.
    Unauthorized,
    /// The addressed registration does not exist.
    NotFound,
    /// The write clashes with stored data, such as a plate already in use.
    Conflict,
    /// The hosted store or auth provider failed.
    ServiceUnavailable,
    /// Anything else; the message is never shown to clients.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    #[must_use]
    pub const fn generic_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// Adapter-facing error.
///
/// The message is never blank: [`Error::new`] substitutes the code's generic
/// message and [`Error::try_new`] and deserialisation reject it.
///
/// # Examples
/// ```
/// use parking_backend::domain::{Error, ErrorCode};
/// use serde_json::json;
///
/// let err = Error::conflict("plate already registered")
///     .with_details(json!({ "field": "plate" }));
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.details(), Some(&json!({ "field": "plate" })));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "conflict")]
    code: ErrorCode,
    #[schema(example = "this licence plate is already registered")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Rejected [`Error`] construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty or whitespace.
    #[error("error message must not be empty")]
    EmptyMessage,
}

macro_rules! code_constructors {
    ($($name:ident => $code:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Error with [`ErrorCode::", stringify!($code), "`].")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )+
    };
}

impl Error {
    /// Build an error, capturing the current [`TraceId`].
    ///
    /// A blank message is replaced with [`ErrorCode::generic_message`].
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|_| Self::assemble(code, code.generic_message().to_owned()))
    }

    /// Build an error, rejecting a blank message.
    ///
    /// # Errors
    /// [`ErrorValidationError::EmptyMessage`] when `message` trims to nothing.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::assemble(code, message))
    }

    fn assemble(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    code_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trace id of the request that produced the error.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured details, such as `{"field": "plate"}`.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Replace the captured trace id.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Wire shape; accepts `trace_id` as an alias when decoding.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(Error { code, message, trace_id, details }: Error) -> Self {
        Self { code, message, trace_id, details }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(dto: ErrorDto) -> Result<Self, Self::Error> {
        let message = dto.message;
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code: dto.code,
            message,
            trace_id: dto.trace_id,
            details: dto.details,
        })
    }
}
