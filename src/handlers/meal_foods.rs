use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{authorize, Action},
    database::queries::MealFoodQueries,
    errors::{AppError, Result},
    handlers::{foods::load_food, meals::load_meal, AppState},
    middleware::{auth::AuthenticatedUser, AppJson},
    models::{MealFoodEntry, MealFoodInput, MealFoodResponse},
};

async fn load_entry(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
    action: Action,
) -> Result<MealFoodEntry> {
    let entry = MealFoodQueries::find_entry(state.database.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal food not found".to_string()))?;

    authorize(user, action, &entry)?;
    Ok(entry)
}

/// Both ends of a meal food must exist and belong to the caller.
async fn check_references(
    state: &AppState,
    user: &AuthenticatedUser,
    input: &MealFoodInput,
) -> Result<()> {
    input.validate().map_err(AppError::Validation)?;
    load_meal(state, user, input.meal_id, Action::Use).await?;
    load_food(state, user, input.food_id, Action::Use).await?;
    Ok(())
}

#[utoipa::path(get, path = "/api/v1/meal-foods", tag = "meal-foods", responses((status = 200, description = "Meal foods across the caller's meals")))]
pub async fn list_meal_foods(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let entries: Vec<MealFoodResponse> =
        MealFoodQueries::list_entries_by_owner(state.database.pool(), user.id)
            .await?
            .into_iter()
            .map(MealFoodResponse::from)
            .collect();

    Ok(Json(json!({ "data": entries })))
}

#[utoipa::path(
    post,
    path = "/api/v1/meal-foods",
    tag = "meal-foods",
    request_body = MealFoodInput,
    responses(
        (status = 201, description = "Meal food created"),
        (status = 400, description = "Invalid quantity"),
        (status = 403, description = "Meal or food belongs to another user"),
        (status = 404, description = "Meal or food not found")
    )
)]
pub async fn create_meal_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(input): AppJson<MealFoodInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    check_references(&state, &user, &input).await?;

    let meal_food = MealFoodQueries::create_meal_food(state.database.pool(), &input).await?;
    let entry = load_entry(&state, &user, meal_food.id, Action::View).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "MealFood was created!", "data": MealFoodResponse::from(entry) })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/meal-foods/{id}",
    tag = "meal-foods",
    params(("id" = Uuid, Path, description = "Meal food id")),
    responses(
        (status = 200, description = "Meal food detail with its nutrients"),
        (status = 403, description = "Meal food belongs to another user"),
        (status = 404, description = "Meal food not found")
    )
)]
pub async fn get_meal_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let entry = load_entry(&state, &user, id, Action::View).await?;

    Ok(Json(json!({ "data": MealFoodResponse::from(entry) })))
}

#[utoipa::path(
    put,
    path = "/api/v1/meal-foods/{id}",
    tag = "meal-foods",
    params(("id" = Uuid, Path, description = "Meal food id")),
    request_body = MealFoodInput,
    responses(
        (status = 200, description = "Meal food updated"),
        (status = 400, description = "Invalid quantity"),
        (status = 403, description = "Meal food, meal or food belongs to another user"),
        (status = 404, description = "Meal food, meal or food not found")
    )
)]
pub async fn update_meal_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<MealFoodInput>,
) -> Result<Json<serde_json::Value>> {
    load_entry(&state, &user, id, Action::Update).await?;
    check_references(&state, &user, &input).await?;

    MealFoodQueries::update_meal_food(state.database.pool(), id, &input).await?;
    let entry = load_entry(&state, &user, id, Action::View).await?;

    Ok(Json(json!({ "message": "Meal-Food was updated!", "data": MealFoodResponse::from(entry) })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meal-foods/{id}",
    tag = "meal-foods",
    params(("id" = Uuid, Path, description = "Meal food id")),
    responses(
        (status = 200, description = "Meal food deleted"),
        (status = 403, description = "Meal food belongs to another user"),
        (status = 404, description = "Meal food not found")
    )
)]
pub async fn delete_meal_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let entry = load_entry(&state, &user, id, Action::Delete).await?;

    if !MealFoodQueries::delete_meal_food(state.database.pool(), entry.id).await? {
        return Err(AppError::NotFound("Meal food not found".to_string()));
    }

    Ok(Json(json!({ "message": "MealFood was successfully deleted." })))
}
