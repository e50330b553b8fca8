use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use serde_json::json;

use crate::{
    errors::Result,
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    services::snapshots::SnapshotService,
};

/// Accepts `{"<username>": <payload>}` from external clients and stores it as
/// that user's snapshot for today. Every failure is reported as 400.
#[utoipa::path(
    post,
    path = "/api/v1/nutrients/save",
    tag = "nutrients",
    responses(
        (status = 201, description = "Snapshot stored"),
        (status = 400, description = "Malformed payload, storage failure or wrong method")
    )
)]
pub async fn save_nutrient_data(State(state): State<AppState>, body: Bytes) -> Response {
    let today = Local::now().date_naive();

    match state.snapshots.save(&body, today).await {
        Ok(_) => {
            state.metrics.record_snapshot_saved();
            (
                StatusCode::CREATED,
                Json(json!({ "message": "Nutrient data saved successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Rejected nutrient snapshot: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.public_message() })),
            )
                .into_response()
        }
    }
}

pub async fn invalid_request() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid request" })))
}

#[utoipa::path(get, path = "/api/v1/nutrients", tag = "nutrients", responses((status = 200, description = "Dates with a snapshot, newest first")))]
pub async fn list_nutrient_dates(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let dates = state.snapshots.list(&user.username).await?;

    Ok(Json(json!({ "dates": dates })))
}

#[utoipa::path(
    get,
    path = "/api/v1/nutrients/{date}",
    tag = "nutrients",
    params(("date" = String, Path, description = "Calendar date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Snapshot stored for that date"),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "No snapshot for that date")
    )
)]
pub async fn get_nutrient_data(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(date): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let date = SnapshotService::parse_date(&date)?;
    let data = state.snapshots.get(&user.username, date).await?;

    Ok(Json(json!({ "date": date, "data": data })))
}
