use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{authorize, Action},
    database::queries::FoodQueries,
    errors::{AppError, Result},
    handlers::AppState,
    middleware::{auth::AuthenticatedUser, AppJson},
    models::{Food, FoodInput},
};

/// Fetches a food and checks the caller may perform `action` on it.
pub(crate) async fn load_food(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
    action: Action,
) -> Result<Food> {
    let food = FoodQueries::find_by_id(state.database.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Food not found".to_string()))?;

    authorize(user, action, &food)?;
    Ok(food)
}

#[utoipa::path(get, path = "/api/v1/foods", tag = "foods", responses((status = 200, description = "The caller's foods")))]
pub async fn list_foods(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let foods = FoodQueries::list_by_owner(state.database.pool(), user.id).await?;

    Ok(Json(json!({ "data": foods })))
}

#[utoipa::path(
    post,
    path = "/api/v1/foods",
    tag = "foods",
    request_body = FoodInput,
    responses(
        (status = 201, description = "Food created"),
        (status = 400, description = "Invalid input or duplicate name")
    )
)]
pub async fn create_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(input): AppJson<FoodInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let input = input.validated().map_err(AppError::Validation)?;
    let food = FoodQueries::create_food(state.database.pool(), user.id, &input).await?;

    tracing::info!(username = %user.username, food = %food.name, "food created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Food was created!", "data": food })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/foods/{id}",
    tag = "foods",
    params(("id" = Uuid, Path, description = "Food id")),
    responses(
        (status = 200, description = "Food detail"),
        (status = 403, description = "Food belongs to another user"),
        (status = 404, description = "Food not found")
    )
)]
pub async fn get_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let food = load_food(&state, &user, id, Action::View).await?;
    let per_100g = food.macros();

    Ok(Json(json!({ "data": food, "per_100g": per_100g })))
}

#[utoipa::path(
    put,
    path = "/api/v1/foods/{id}",
    tag = "foods",
    params(("id" = Uuid, Path, description = "Food id")),
    request_body = FoodInput,
    responses(
        (status = 200, description = "Food updated"),
        (status = 400, description = "Invalid input or duplicate name"),
        (status = 403, description = "Food belongs to another user"),
        (status = 404, description = "Food not found")
    )
)]
pub async fn update_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<FoodInput>,
) -> Result<Json<serde_json::Value>> {
    load_food(&state, &user, id, Action::Update).await?;
    let input = input.validated().map_err(AppError::Validation)?;

    let food = FoodQueries::update_food(state.database.pool(), id, &input).await?;

    Ok(Json(json!({ "message": "Food was updated!", "data": food })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/foods/{id}",
    tag = "foods",
    params(("id" = Uuid, Path, description = "Food id")),
    responses(
        (status = 200, description = "Food deleted"),
        (status = 403, description = "Food belongs to another user"),
        (status = 404, description = "Food not found")
    )
)]
pub async fn delete_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let food = load_food(&state, &user, id, Action::Delete).await?;

    if !FoodQueries::delete_food(state.database.pool(), food.id).await? {
        return Err(AppError::NotFound("Food not found".to_string()));
    }
    tracing::info!(username = %user.username, food = %food.name, "food deleted");

    Ok(Json(json!({ "message": "Food was successfully deleted." })))
}
