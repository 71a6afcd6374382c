//! Wire DTOs for the Supabase REST and auth APIs.
//!
//! Column names follow the hosted table, which predates this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{NewVehicleRegistration, VehicleId, VehicleRegistration};

/// Insert payload for one registration row.
#[derive(Debug, Serialize)]
pub(super) struct NewVehicleRowDto<'a> {
    pub(super) nome_completo: &'a str,
    pub(super) telefone: &'a str,
    pub(super) marca_carro: &'a str,
    pub(super) modelo_carro: &'a str,
    pub(super) matricula_carro: &'a str,
}

impl<'a> From<&'a NewVehicleRegistration> for NewVehicleRowDto<'a> {
    fn from(value: &'a NewVehicleRegistration) -> Self {
        Self {
            nome_completo: value.owner_name(),
            telefone: value.phone(),
            marca_carro: value.brand(),
            modelo_carro: value.model(),
            matricula_carro: value.plate(),
        }
    }
}

/// One row as returned by `select=*`.
#[derive(Debug, Deserialize)]
pub(super) struct VehicleRowDto {
    pub(super) id: Uuid,
    pub(super) nome_completo: String,
    pub(super) telefone: String,
    pub(super) marca_carro: String,
    pub(super) modelo_carro: String,
    pub(super) matricula_carro: String,
    pub(super) created_at: DateTime<Utc>,
}

impl From<VehicleRowDto> for VehicleRegistration {
    fn from(row: VehicleRowDto) -> Self {
        VehicleRegistration::from_stored(
            VehicleId::from_uuid(row.id),
            row.nome_completo,
            row.telefone,
            row.marca_carro,
            row.modelo_carro,
            row.matricula_carro,
            row.created_at,
        )
    }
}

/// PostgREST error body.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PostgrestErrorDto {
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// Password grant request body.
#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

/// Session returned by a successful password grant.
#[derive(Debug, Deserialize)]
pub(super) struct AuthSessionDto {
    pub(super) access_token: String,
    pub(super) user: AuthUserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
}

/// GoTrue error body; older servers use `error_description`, newer `msg`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AuthErrorDto {
    #[serde(default)]
    pub(super) error_description: Option<String>,
    #[serde(default)]
    pub(super) msg: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl AuthErrorDto {
    pub(super) fn text(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
    }
}
