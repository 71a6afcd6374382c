//! PostgREST-backed vehicle store.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{NewVehicleRowDto, PostgrestErrorDto, VehicleRowDto};
use super::{SupabaseClientError, SupabaseConfig, body_preview, build_client, endpoint};
use crate::domain::ports::{UNIQUE_VIOLATION_CODE, VehicleStore, VehicleStoreError};
use crate::domain::{NewVehicleRegistration, VehicleId, VehicleRegistration};

/// [`VehicleStore`] over the project's REST API.
pub struct SupabaseVehicleStore {
    client: Client,
    table_url: Url,
}

impl SupabaseVehicleStore {
    /// Build a store for `config.table`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be extended or the client cannot
    /// be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseClientError> {
        Ok(Self {
            client: build_client(config)?,
            table_url: endpoint(&config.url, &["rest", "v1", config.table.as_str()])?,
        })
    }

    fn list_url(&self) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");
        url
    }

    fn row_url(&self, id: &VehicleId) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        url
    }
}

#[async_trait]
impl VehicleStore for SupabaseVehicleStore {
    async fn create(&self, registration: &NewVehicleRegistration) -> Result<(), VehicleStoreError> {
        let response = self
            .client
            .post(self.table_url.clone())
            .header("Prefer", HeaderValue::from_static("return=minimal"))
            .json(&NewVehicleRowDto::from(registration))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(plate = registration.plate(), "vehicle row inserted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<VehicleRegistration>, VehicleStoreError> {
        let response = self
            .client
            .get(self.list_url())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_rows(body.as_ref())
    }

    async fn delete_by_id(&self, id: &VehicleId) -> Result<(), VehicleStoreError> {
        let response = self
            .client
            .delete(self.row_url(id))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(%id, "vehicle row deleted");
        Ok(())
    }
}

fn parse_rows(body: &[u8]) -> Result<Vec<VehicleRegistration>, VehicleStoreError> {
    let rows: Vec<VehicleRowDto> = serde_json::from_slice(body).map_err(|error| {
        VehicleStoreError::query(format!("invalid vehicle rows payload: {error}"))
    })?;
    Ok(rows.into_iter().map(VehicleRegistration::from).collect())
}

fn map_transport_error(error: reqwest::Error) -> VehicleStoreError {
    VehicleStoreError::connection(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> VehicleStoreError {
    let decoded: PostgrestErrorDto = serde_json::from_slice(body).unwrap_or_default();
    let detail = decoded
        .message
        .clone()
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    if decoded.code.as_deref() == Some(UNIQUE_VIOLATION_CODE) {
        return VehicleStoreError::unique_violation(message);
    }
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            VehicleStoreError::connection(message)
        }
        _ => VehicleStoreError::query(message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network PostgREST mapping helpers.
    use super::*;
    use rstest::rstest;

    fn store() -> SupabaseVehicleStore {
        let url = Url::parse("https://abc.supabase.co").expect("valid url");
        SupabaseVehicleStore::new(&SupabaseConfig::new(url, "anon-key")).expect("store builds")
    }

    #[rstest]
    fn list_url_orders_newest_first() {
        assert_eq!(
            store().list_url().as_str(),
            "https://abc.supabase.co/rest/v1/fieis_veiculos?select=*&order=created_at.desc"
        );
    }

    #[rstest]
    fn row_url_filters_by_id() {
        let id: VehicleId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().expect("uuid");
        assert_eq!(
            store().row_url(&id).as_str(),
            "https://abc.supabase.co/rest/v1/fieis_veiculos?id=eq.3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }

    #[rstest]
    fn unique_violation_code_is_recognised() {
        let body = br#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value violates unique constraint \"fieis_veiculos_matricula_carro_key\""}"#;
        let error = map_status_error(StatusCode::CONFLICT, body);
        assert!(error.is_unique_violation());
        assert!(error.to_string().contains("duplicate key value"));
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED, br#"{"code":"42501","message":"permission denied"}"#.as_slice(), false)]
    #[case(StatusCode::BAD_REQUEST, b"not json".as_slice(), false)]
    #[case(StatusCode::SERVICE_UNAVAILABLE, b"".as_slice(), true)]
    #[case(StatusCode::GATEWAY_TIMEOUT, b"upstream timeout".as_slice(), true)]
    fn other_statuses_map_to_query_or_connection(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] connection: bool,
    ) {
        let error = map_status_error(status, body);
        assert!(!error.is_unique_violation());
        assert_eq!(
            matches!(error, VehicleStoreError::Connection { .. }),
            connection,
            "unexpected mapping: {error}"
        );
    }

    #[rstest]
    fn parses_rows_with_table_column_names() {
        let body = r#"[
            {
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "nome_completo": "Ana Silva",
                "telefone": "912 345 678",
                "marca_carro": "Toyota",
                "modelo_carro": "Corolla",
                "matricula_carro": "12-AB-34",
                "created_at": "2025-06-01T10:00:00.123456+00:00"
            }
        ]"#;

        let rows = parse_rows(body.as_bytes()).expect("rows decode");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].owner_name(), "Ana Silva");
        assert_eq!(rows[0].plate(), "12-AB-34");
        assert_eq!(
            rows[0].id().to_string(),
            "3fa85f64-5717-4562-b3fc-2c963f66afa6"
        );
    }

    #[rstest]
    fn stored_rows_decode_verbatim() {
        let body = r#"[
            {
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "nome_completo": "Ana Silva",
                "telefone": "912 345 678",
                "marca_carro": "Toyota",
                "modelo_carro": "Corolla",
                "matricula_carro": "12-AB-34",
                "created_at": "2025-06-01T10:00:00+00:00"
            },
            {
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa7",
                "nome_completo": " Rui ",
                "telefone": "",
                "marca_carro": "Seat",
                "modelo_carro": "Ibiza",
                "matricula_carro": "aa-00-01",
                "created_at": "2025-05-01T10:00:00+00:00"
            }
        ]"#;

        let rows = parse_rows(body.as_bytes()).expect("rows decode");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].plate(), "12-AB-34");
        assert_eq!(rows[1].owner_name(), " Rui ");
        assert_eq!(rows[1].phone(), "");
        assert_eq!(rows[1].plate(), "aa-00-01");
    }

    #[rstest]
    fn malformed_rows_are_query_errors() {
        let error = parse_rows(br#"[{"id":"nope"}]"#).expect_err("decode fails");
        assert!(matches!(error, VehicleStoreError::Query { .. }));
    }

    #[rstest]
    fn insert_payload_uses_table_columns() {
        let payload =
            NewVehicleRegistration::try_from_parts("Ana", "912 345 678", "Seat", "Ibiza", "aa-00-01")
                .expect("valid payload");
        let json = serde_json::to_value(NewVehicleRowDto::from(&payload)).expect("serialise");
        assert_eq!(json["nome_completo"], "Ana");
        assert_eq!(json["matricula_carro"], "AA-00-01");
        assert!(json.get("id").is_none());
    }
}
