//! Public vehicle registration endpoint.
//!
//! ```text
//! POST /api/v1/vehicles {"ownerName":"Ana Silva","phone":"912345678",...}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, RegistrationForm, SubmitOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration form as typed by the visitor.
///
/// Missing keys count as blank fields. The phone is re-formatted and the
/// plate upper-cased exactly as the form does while typing.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterVehicleRequest {
    /// Owner's full name.
    #[schema(example = "Ana Silva")]
    pub owner_name: String,
    /// Contact phone, any punctuation.
    #[schema(example = "912345678")]
    pub phone: String,
    /// Car brand.
    #[schema(example = "Toyota")]
    pub brand: String,
    /// Car model.
    #[schema(example = "Corolla")]
    pub model: String,
    /// Licence plate.
    #[schema(example = "12-ab-34")]
    pub plate: String,
}

impl From<RegisterVehicleRequest> for RegistrationForm {
    fn from(value: RegisterVehicleRequest) -> Self {
        let mut form = RegistrationForm::new();
        form.set_owner_name(value.owner_name);
        form.update_phone(&value.phone);
        form.set_brand(value.brand);
        form.set_model(value.model);
        form.update_plate(&value.plate);
        form
    }
}

/// Body returned after a successful registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVehicleResponse {
    /// Always `registered`.
    #[schema(example = "registered")]
    pub status: String,
    /// Confirmation shown to the visitor.
    #[schema(example = "Vehicle registered successfully")]
    pub message: String,
}

/// Register a vehicle.
///
/// Each request fills and submits its own form, so the in-flight guard only
/// applies within a form; concurrent requests from one client are all sent to
/// the store, which rejects duplicate plates.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = RegisterVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = RegisterVehicleResponse),
        (status = 400, description = "A field is blank", body = Error),
        (status = 409, description = "Plate already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "registerVehicle",
    security([])
)]
#[post("/vehicles")]
pub async fn register_vehicle(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterVehicleRequest>,
) -> ApiResult<HttpResponse> {
    let flow = state.registration_flow();
    let form = RegistrationForm::from(payload.into_inner());
    flow.edit(|current| *current = form);

    match flow.submit().await? {
        SubmitOutcome::Registered => Ok(HttpResponse::Created().json(RegisterVehicleResponse {
            status: "registered".to_owned(),
            message: "Vehicle registered successfully".to_owned(),
        })),
        SubmitOutcome::Ignored => Err(Error::conflict("a submission is already in progress")),
    }
}
