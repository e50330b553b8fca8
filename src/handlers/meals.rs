use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{authorize, Action},
    database::queries::MealQueries,
    errors::{AppError, Result},
    handlers::AppState,
    middleware::{auth::AuthenticatedUser, AppJson},
    models::{Meal, MealInput},
};

pub(crate) async fn load_meal(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
    action: Action,
) -> Result<Meal> {
    let meal = MealQueries::find_by_id(state.database.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;

    authorize(user, action, &meal)?;
    Ok(meal)
}

#[utoipa::path(get, path = "/api/v1/meals", tag = "meals", responses((status = 200, description = "The caller's meals in order")))]
pub async fn list_meals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let meals = MealQueries::list_by_owner(state.database.pool(), user.id).await?;

    Ok(Json(json!({ "data": meals })))
}

#[utoipa::path(
    post,
    path = "/api/v1/meals",
    tag = "meals",
    request_body = MealInput,
    responses(
        (status = 201, description = "Meal created"),
        (status = 400, description = "Invalid input or duplicate meal type")
    )
)]
pub async fn create_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(input): AppJson<MealInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let input = input.validated().map_err(AppError::Validation)?;
    let meal = MealQueries::create_meal(state.database.pool(), user.id, &input).await?;

    tracing::info!(username = %user.username, meal = %meal.meal_type, "meal created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Meal was created!", "data": meal })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/meals/{id}",
    tag = "meals",
    params(("id" = Uuid, Path, description = "Meal id")),
    responses(
        (status = 200, description = "Meal detail"),
        (status = 403, description = "Meal belongs to another user"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn get_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let meal = load_meal(&state, &user, id, Action::View).await?;

    Ok(Json(json!({ "data": meal })))
}

#[utoipa::path(
    put,
    path = "/api/v1/meals/{id}",
    tag = "meals",
    params(("id" = Uuid, Path, description = "Meal id")),
    request_body = MealInput,
    responses(
        (status = 200, description = "Meal updated"),
        (status = 400, description = "Invalid input or duplicate meal type"),
        (status = 403, description = "Meal belongs to another user"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn update_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<MealInput>,
) -> Result<Json<serde_json::Value>> {
    load_meal(&state, &user, id, Action::Update).await?;
    let input = input.validated().map_err(AppError::Validation)?;

    let meal = MealQueries::update_meal(state.database.pool(), id, &input).await?;

    Ok(Json(json!({ "message": "Meal was updated!", "data": meal })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meals/{id}",
    tag = "meals",
    params(("id" = Uuid, Path, description = "Meal id")),
    responses(
        (status = 200, description = "Meal deleted together with its meal foods"),
        (status = 403, description = "Meal belongs to another user"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn delete_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let meal = load_meal(&state, &user, id, Action::Delete).await?;

    if !MealQueries::delete_meal(state.database.pool(), meal.id).await? {
        return Err(AppError::NotFound("Meal not found".to_string()));
    }
    tracing::info!(username = %user.username, meal = %meal.meal_type, "meal deleted");

    Ok(Json(json!({ "message": "Meal was successfully deleted." })))
}
