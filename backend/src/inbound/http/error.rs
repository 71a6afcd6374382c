//! HTTP adapter mapping for domain errors.
//!
//! The domain error stays HTTP-agnostic; this module turns it into JSON
//! responses with consistent status codes and maps flow failures onto it.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{
    AuthError, DirectoryError, Error, ErrorCode, LoginValidationError, RegistrationError,
    TRACE_ID_HEADER,
};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Where unauthenticated staff requests should send the browser.
pub const SIGN_IN_PATH: &str = "/auth";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// 401 telling the client to continue at the sign-in page.
pub fn sign_in_required() -> Error {
    Error::unauthorized("sign-in required").with_details(json!({ "redirectTo": SIGN_IN_PATH }))
}

impl From<RegistrationError> for Error {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::MissingField(missing) => Error::invalid_request(missing.to_string())
                .with_details(json!({
                    "field": missing.field().as_str(),
                    "code": "missing_field",
                })),
            RegistrationError::DuplicatePlate => Error::conflict(
                "this licence plate is already registered",
            )
            .with_details(json!({ "field": "plate", "code": "duplicate_plate" })),
            RegistrationError::Submission(source) => {
                error!(error = %source, "registration submission failed");
                Error::service_unavailable("could not register the vehicle, please try again")
            }
        }
    }
}

impl From<DirectoryError> for Error {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::AuthenticationRequired => sign_in_required(),
            DirectoryError::SessionResolving => {
                Error::service_unavailable("session is still being resolved, retry shortly")
            }
            DirectoryError::Load(source) => {
                error!(error = %source, "vehicle directory load failed");
                Error::service_unavailable("could not load vehicle registrations")
            }
            DirectoryError::Delete(source) => {
                error!(error = %source, "vehicle delete failed");
                Error::service_unavailable("could not delete the vehicle registration")
            }
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Error::unauthorized("invalid email or password")
                .with_details(json!({ "code": "invalid_credentials" })),
            AuthError::Unavailable { message } => {
                error!(%message, "authentication provider failed");
                Error::service_unavailable("sign-in is unavailable, please try again")
            }
        }
    }
}

impl From<LoginValidationError> for Error {
    fn from(err: LoginValidationError) -> Self {
        match err {
            LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
                .with_details(json!({ "field": "email", "code": "empty_email" })),
            LoginValidationError::EmptyPassword => {
                Error::invalid_request("password must not be empty")
                    .with_details(json!({ "field": "password", "code": "empty_password" }))
            }
        }
    }
}
