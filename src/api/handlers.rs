//! HTTP request handlers for the relay API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::api::server::ApiState;
use crate::services::ServiceHealthStatus;
use crate::utils::logging::log_api_error;

pub const SERVICE_NAME: &str = "UI Bot API";
pub const API_VERSION: &str = "1.1.0";

/// Request body for POST /get_po_credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub user_id: i64,
    pub request_source: String,
}

/// Response body for POST /get_po_credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsResponse {
    pub status: String,
    pub user_id: i64,
    pub login_enc: String,
    pub password_enc: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub services: ServiceHealthStatus,
}

/// Relay failures, rendered as `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    UnknownSource,
    NotFound { user_id: i64 },
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownSource => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::UnknownSource => "Unknown request source".to_string(),
            ApiError::NotFound { user_id } => format!("Credentials not found for user {}", user_id),
            ApiError::Internal => "Internal database error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// POST /get_po_credentials
///
/// Returns the stored login/password ciphertext for a user. A record holding
/// only a session id counts as not found.
pub async fn post_credentials(
    State(state): State<ApiState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<CredentialsResponse>, ApiError> {
    if !state.is_allowed_source(&body.request_source) {
        warn!(source = %body.request_source, user_id = body.user_id, "Rejected credentials request");
        return Err(ApiError::UnknownSource);
    }

    let record = state.database.get_credentials(body.user_id).await.map_err(|e| {
        log_api_error("get_po_credentials", &e.to_string(), Some(&format!("user_id={}", body.user_id)));
        ApiError::Internal
    })?;

    let Some(pair) = record.and_then(|record| record.login_pair()) else {
        return Err(ApiError::NotFound { user_id: body.user_id });
    };

    info!(user_id = body.user_id, source = %body.request_source, "Credentials relayed");
    Ok(Json(CredentialsResponse {
        status: "success".to_string(),
        user_id: body.user_id,
        login_enc: pair.login_enc,
        password_enc: pair.password_enc,
    }))
}

/// GET /health
///
/// Always 200; component states are reported in the body.
pub async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        services: state.services.health_check().await,
    })
}

/// GET /
pub async fn get_root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": API_VERSION,
        "endpoints": {
            "health": "/health",
            "credentials": "/get_po_credentials",
        },
    }))
}
