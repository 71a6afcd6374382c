//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers every HTTP path from the inbound layer together with
//! the request, response and error schemas they reference, and registers the
//! session cookie security scheme used by the staff endpoints.
//!
//! Swagger UI serves it in debug builds; `cargo run --bin openapi-dump`
//! prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    DirectoryStats, DirectoryView, EmptyState, Error, ErrorCode, RegistrationField,
    StaffIdentity, VehicleDetail, VehicleId, VehicleRegistration,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::staff::DeleteResponse;
use crate::inbound::http::vehicles::{RegisterVehicleRequest, RegisterVehicleResponse};

/// Name of the security scheme guarding staff endpoints.
pub const SESSION_COOKIE_SCHEME: &str = "SessionCookie";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            SESSION_COOKIE_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Parking registration API",
        description = "Public vehicle registration and the session-authenticated staff directory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::vehicles::register_vehicle,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::staff::list_vehicles,
        crate::inbound::http::staff::get_vehicle,
        crate::inbound::http::staff::delete_vehicle,
        crate::inbound::http::staff::send_information,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        StaffIdentity,
        VehicleId,
        RegistrationField,
        VehicleRegistration,
        DirectoryStats,
        DirectoryView,
        EmptyState,
        VehicleDetail,
        LoginRequest,
        RegisterVehicleRequest,
        RegisterVehicleResponse,
        DeleteResponse,
    )),
    tags(
        (name = "vehicles", description = "Public vehicle registration"),
        (name = "auth", description = "Staff sign-in and sign-out"),
        (name = "staff", description = "Staff directory of registrations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(doc: &utoipa::openapi::OpenApi, name: &str) -> Vec<String> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected {name} to be an object schema"),
        }
    }

    #[rstest]
    #[case("/api/v1/vehicles")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/auth/logout")]
    #[case("/api/v1/auth/session")]
    #[case("/api/v1/staff/vehicles")]
    #[case("/api/v1/staff/vehicles/{id}")]
    #[case("/api/v1/staff/vehicles/{id}/send-information")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_uses_camel_case_envelope() {
        let fields = object_fields(&ApiDoc::openapi(), "Error");
        for field in ["code", "message", "traceId", "details"] {
            assert!(fields.iter().any(|f| f == field), "Error lacks {field}");
        }
    }

    #[rstest]
    fn registration_schema_exposes_public_fields() {
        let fields = object_fields(&ApiDoc::openapi(), "VehicleRegistration");
        for field in ["id", "ownerName", "phone", "brand", "model", "plate", "createdAt"] {
            assert!(fields.iter().any(|f| f == field), "VehicleRegistration lacks {field}");
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(SESSION_COOKIE_SCHEME));
    }
}
