//! Staff directory endpoints.
//!
//! ```text
//! GET    /api/v1/staff/vehicles?search=civ&brand=Honda
//! GET    /api/v1/staff/vehicles/{id}
//! DELETE /api/v1/staff/vehicles/{id}?confirm=true
//! POST   /api/v1/staff/vehicles/{id}/send-information
//! ```
//!
//! Every call loads a fresh snapshot from the store before acting on it, so
//! the staff view never depends on state from earlier requests.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::VehicleStore;
use crate::domain::{
    BrandFilter, Deletion, DirectoryFilter, DirectoryFlow, DirectoryView, Error, VehicleDetail,
    VehicleId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Search and brand filter for the directory listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectoryQuery {
    /// Case-insensitive substring of owner name, model or plate.
    pub search: Option<String>,
    /// Exact brand, ignoring case; `all` or absent for every brand.
    pub brand: Option<String>,
}

impl From<DirectoryQuery> for DirectoryFilter {
    fn from(value: DirectoryQuery) -> Self {
        DirectoryFilter::new(
            value.search.unwrap_or_default(),
            BrandFilter::parse(value.brand.as_deref()),
        )
    }
}

/// Delete confirmation flag.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Must be `true` for the delete to go ahead.
    pub confirm: Option<bool>,
}

/// Outcome of a delete request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// `deleted` or `declined`.
    #[schema(example = "declined")]
    pub status: String,
    /// Question that needs a confirmed answer, when declined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Registrations left after the reload, when deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

fn parse_vehicle_id(raw: &str) -> Result<VehicleId, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("vehicle id must be a UUID")
            .with_details(json!({ "field": "id", "value": raw }))
    })
}

async fn loaded_flow(
    state: &HttpState,
    session: &SessionContext,
) -> ApiResult<DirectoryFlow<dyn VehicleStore>> {
    let flow = state.directory_flow();
    flow.load(session).await?;
    Ok(flow)
}

fn vehicle_not_found(id: VehicleId) -> Error {
    Error::not_found("vehicle registration not found").with_details(json!({ "id": id }))
}

/// List registrations matching the search term and brand filter.
#[utoipa::path(
    get,
    path = "/api/v1/staff/vehicles",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Filtered directory", body = DirectoryView),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["staff"],
    operation_id = "listVehicles",
    security(("SessionCookie" = []))
)]
#[get("/staff/vehicles")]
pub async fn list_vehicles(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DirectoryQuery>,
) -> ApiResult<HttpResponse> {
    let flow = loaded_flow(&state, &session).await?;
    let view = flow.view(&DirectoryFilter::from(query.into_inner()));
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(view))
}

/// Full detail of one registration.
#[utoipa::path(
    get,
    path = "/api/v1/staff/vehicles/{id}",
    params(("id" = String, Path, description = "Registration id")),
    responses(
        (status = 200, description = "Registration detail", body = VehicleDetail),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 404, description = "Unknown registration", body = Error)
    ),
    tags = ["staff"],
    operation_id = "getVehicle",
    security(("SessionCookie" = []))
)]
#[get("/staff/vehicles/{id}")]
pub async fn get_vehicle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_vehicle_id(&path)?;
    let flow = loaded_flow(&state, &session).await?;
    let detail = flow.view_details(id).ok_or_else(|| vehicle_not_found(id))?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(detail))
}

/// Delete a registration once `confirm=true` is supplied.
#[utoipa::path(
    delete,
    path = "/api/v1/staff/vehicles/{id}",
    params(("id" = String, Path, description = "Registration id"), DeleteQuery),
    responses(
        (status = 200, description = "Deleted, or declined without confirmation", body = DeleteResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 404, description = "Unknown registration", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["staff"],
    operation_id = "deleteVehicle",
    security(("SessionCookie" = []))
)]
#[delete("/staff/vehicles/{id}")]
pub async fn delete_vehicle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_vehicle_id(&path)?;
    let flow = loaded_flow(&state, &session).await?;
    let record = flow.find(id).ok_or_else(|| vehicle_not_found(id))?;
    let confirmed = query.confirm.unwrap_or(false);

    let response = match flow.delete(&session, &record, &confirmed).await? {
        Deletion::Declined { prompt } => DeleteResponse {
            status: "declined".to_owned(),
            prompt: Some(prompt),
            total: None,
        },
        Deletion::Deleted => DeleteResponse {
            status: "deleted".to_owned(),
            prompt: None,
            total: Some(flow.records().len()),
        },
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(response))
}

/// Record a request to send information to the owner.
#[utoipa::path(
    post,
    path = "/api/v1/staff/vehicles/{id}/send-information",
    params(("id" = String, Path, description = "Registration id")),
    responses(
        (status = 202, description = "Request recorded"),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 404, description = "Unknown registration", body = Error)
    ),
    tags = ["staff"],
    operation_id = "sendVehicleInformation",
    security(("SessionCookie" = []))
)]
#[post("/staff/vehicles/{id}/send-information")]
pub async fn send_information(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_vehicle_id(&path)?;
    let flow = loaded_flow(&state, &session).await?;
    let detail = flow.view_details(id).ok_or_else(|| vehicle_not_found(id))?;
    detail.send_information();
    Ok(HttpResponse::Accepted().finish())
}

#[cfg(test)]
#[path = "staff_tests.rs"]
mod tests;
