//! HTTP API: recommendations, catalog, CSV export, health checks and Prometheus metrics

use advisor_lib::{
    catalog::Catalog,
    export::{to_csv, ProfileSelection, DEFAULT_CSV_FILENAME},
    health::HealthRegistry,
    observability::AdvisorMetrics,
    Advice, AdvisorError, Advisor, Profile, Requester, SizingInput, WorkloadRole,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: AdvisorMetrics,
    pub advisor: Advisor,
}

impl AppState {
    pub fn new(health_registry: HealthRegistry, metrics: AdvisorMetrics, advisor: Advisor) -> Self {
        Self {
            health_registry,
            metrics,
            advisor,
        }
    }
}

/// Body of `POST /api/v1/recommendations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub cpu_count: Option<i64>,
    pub memory_gb: Option<i64>,
    pub role: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Query of the catalog endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub role: Option<String>,
}

/// Query of the CSV export endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    pub cpu_count: Option<i64>,
    pub memory_gb: Option<i64>,
    pub role: Option<String>,
    pub profile: Option<String>,
    pub ticket_id: Option<String>,
    pub email: Option<String>,
}

/// Response header carrying an audit warning on CSV exports
pub const AUDIT_WARNING_HEADER: &str = "x-audit-warning";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Handler error mapped onto an HTTP response
pub enum ApiError {
    Rejected(AdvisorError),
    Internal(String),
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        ApiError::Rejected(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Rejected(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: e.to_string(),
                    code: Some(e.code().to_string()),
                    details: Some(e.guidance().to_string()),
                },
            ),
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: message,
                        code: None,
                        details: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(AdvisorError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(AdvisorError::InvalidInput(rejection.body_text()))
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, AdvisorError> {
    value.ok_or_else(|| AdvisorError::InvalidInput(format!("{} is required", field)))
}

fn parse_sizing_and_role(
    cpu_count: Option<i64>,
    memory_gb: Option<i64>,
    role: Option<&str>,
) -> Result<(SizingInput, WorkloadRole), AdvisorError> {
    let sizing = SizingInput::new(
        required("cpu_count", cpu_count)?,
        required("memory_gb", memory_gb)?,
    )?;
    let role = required("role", role)?.parse()?;
    Ok((sizing, role))
}

/// Blank free-text fields count as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Health check response - always 200, a degraded audit sink keeps serving
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.health_registry.health().await))
}

/// Readiness check response - 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| ApiError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        buffer,
    ))
}

async fn catalog(
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<Json<Catalog>, ApiError> {
    let Query(query) = query?;
    let role = query
        .role
        .as_deref()
        .map(str::parse::<WorkloadRole>)
        .transpose()?;
    Ok(Json(Catalog::for_role(role)))
}

/// Validate, run and audit one request; rejections are counted
async fn advise(
    state: &AppState,
    sizing: Result<(SizingInput, WorkloadRole), AdvisorError>,
    ticket_id: Option<String>,
    email: Option<String>,
) -> Result<Advice, ApiError> {
    let (sizing, role) = sizing.map_err(|e| {
        state.metrics.inc_rejections(&e);
        e
    })?;
    let requester = Requester::new(non_blank(ticket_id), non_blank(email));

    let advice = state.advisor.advise(sizing, role, requester).await?;

    if state.advisor.audit_sink().is_some() {
        state
            .health_registry
            .record_audit_outcome(advice.warnings.first().map(|w| w.message.as_str()))
            .await;
    }

    Ok(advice)
}

fn rejected<T>(state: &AppState, error: ApiError) -> Result<T, ApiError> {
    if let ApiError::Rejected(e) = &error {
        state.metrics.inc_rejections(e);
    }
    Err(error)
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<Advice>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejected(&state, rejection.into()),
    };

    let sizing = parse_sizing_and_role(request.cpu_count, request.memory_gb, request.role.as_deref());
    let advice = advise(&state, sizing, request.ticket_id, request.email).await?;

    Ok(Json(advice))
}

/// CSV export; audited like a recommendation, with any warning in a header
async fn export_csv(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return rejected(&state, rejection.into()),
    };
    let profile = match query.profile.as_deref().map(str::parse::<Profile>).transpose() {
        Ok(profile) => profile,
        Err(e) => return rejected(&state, e.into()),
    };

    let sizing = parse_sizing_and_role(query.cpu_count, query.memory_gb, query.role.as_deref());
    let advice = advise(&state, sizing, query.ticket_id, query.email).await?;

    let csv = to_csv(&advice.recommendation, ProfileSelection::from(profile))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DEFAULT_CSV_FILENAME),
            ),
        ],
        csv,
    )
        .into_response();

    if let Some(warning) = advice.warnings.first() {
        if let Ok(value) = HeaderValue::from_str(&header_safe(&warning.to_string())) {
            response.headers_mut().insert(AUDIT_WARNING_HEADER, value);
        }
    }

    Ok(response)
}

/// Header values are restricted to visible ASCII
fn header_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/recommendations", post(recommend))
        .route("/api/v1/recommendations/export", get(export_csv))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_invalid_input() {
        let err = parse_sizing_and_role(None, Some(16), Some("OLTP")).unwrap_err();
        assert_eq!(err, AdvisorError::InvalidInput("cpu_count is required".into()));

        let err = parse_sizing_and_role(Some(4), Some(16), None).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn test_parse_valid_request() {
        let (sizing, role) = parse_sizing_and_role(Some(32), Some(128), Some("olap")).unwrap();
        assert_eq!(sizing.cpu_count, 32);
        assert_eq!(role, WorkloadRole::Olap);
    }

    #[test]
    fn test_header_safe() {
        assert_eq!(header_safe("upload returned 503"), "upload returned 503");
        assert_eq!(header_safe("disk\nfull: é"), "disk?full: ?");
        assert!(HeaderValue::from_str(&header_safe("a\tb\r\n")).is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" INC-9 ".into())), Some("INC-9".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
