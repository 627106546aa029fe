use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundStatus {
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OcrStatus {
    Loaded,
    NotLoaded,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub version: String,
    pub background_removal: BackgroundStatus,
    pub ocr: OcrStatus,
    pub ocr_languages: String,
}

/// `GET /api/status`
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "health",
    responses(
        (status = 200, description = "Capability status", body = ServiceStatus),
    )
)]
pub async fn service_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    let background_removal = if state.background.is_available() {
        BackgroundStatus::Ready
    } else {
        BackgroundStatus::Unavailable
    };

    // Reporting never triggers the OCR engine load.
    let ocr = if state.ocr.is_loaded() {
        OcrStatus::Loaded
    } else {
        OcrStatus::NotLoaded
    };

    Json(ServiceStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        background_removal,
        ocr,
        ocr_languages: state.ocr.languages().to_string(),
    })
}
