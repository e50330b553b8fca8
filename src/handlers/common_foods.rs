use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use std::collections::HashSet;

use crate::{
    database::queries::{CommonFoodQueries, FoodQueries},
    errors::{AppError, Result},
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    models::{CommonFoodListing, FoodInput},
};

#[utoipa::path(get, path = "/api/v1/common-foods", tag = "common-foods", responses((status = 200, description = "Catalog entries flagged with whether the caller already has them")))]
pub async fn list_common_foods(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let pool = state.database.pool();
    let my_foods: HashSet<String> = FoodQueries::names_by_owner(pool, user.id)
        .await?
        .into_iter()
        .collect();

    let listings: Vec<CommonFoodListing> = CommonFoodQueries::list_all(pool)
        .await?
        .into_iter()
        .map(|food| CommonFoodListing {
            is_in_my_foods: my_foods.contains(&food.name),
            food,
        })
        .collect();

    Ok(Json(json!({ "data": listings })))
}

#[utoipa::path(
    post,
    path = "/api/v1/common-foods/{id}/add",
    tag = "common-foods",
    params(("id" = i64, Path, description = "Common food id")),
    responses(
        (status = 201, description = "Copied into the caller's foods"),
        (status = 400, description = "The caller already has a food with that name"),
        (status = 404, description = "Common food not found")
    )
)]
pub async fn add_common_food(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let pool = state.database.pool();
    let common_food = CommonFoodQueries::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Common food not found".to_string()))?;

    let input = FoodInput {
        name: common_food.name.clone(),
        calories: common_food.calories,
        carbs: common_food.carbs,
        protein: common_food.protein,
        fats: common_food.fats,
    };

    let food = match FoodQueries::create_food(pool, user.id, &input).await {
        Err(AppError::Validation(_)) => {
            return Err(AppError::Validation(format!(
                "You already have a food '{}' in your food list.",
                common_food.name
            )))
        }
        other => other?,
    };

    tracing::info!(username = %user.username, food = %food.name, "common food added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Food was added to your food list!", "data": food })),
    ))
}
