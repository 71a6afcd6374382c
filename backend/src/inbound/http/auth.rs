//! Staff sign-in endpoints.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"obreiro@example.org","password":"password"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, StaffIdentity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "obreiro@example.org")]
    pub email: String,
    #[schema(example = "password")]
    pub password: String,
}

/// Sign in and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = StaffIdentity,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Provider unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&request.email, &request.password)?;
    let identity = state.auth.sign_in(&credentials).await?;
    session.persist_identity(&identity)?;
    info!(user_id = identity.user_id(), "staff member signed in");
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(identity.public_view()))
}

/// Sign out and clear the session. Succeeds without a session too.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if let Some(identity) = session.identity() {
        state.auth.sign_out(&identity).await;
        info!(user_id = identity.user_id(), "staff member signed out");
    }
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Current staff identity.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Signed in", body = StaffIdentity),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession",
    security(("SessionCookie" = []))
)]
#[get("/auth/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(identity.public_view()))
}
