use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    auth::{authorize, Action},
    errors::Result,
    handlers::AppState,
    middleware::auth::AuthenticatedUser,
    services::aggregator::{DailyMacronutrients, MacroAggregator},
};

#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/meals",
    tag = "summary",
    params(("username" = String, Path, description = "Owner of the meals")),
    responses(
        (status = 200, description = "Per-meal breakdown and overall macronutrient totals"),
        (status = 403, description = "Summary of another user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_meals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(username): Path<String>,
) -> Result<Json<DailyMacronutrients>> {
    let pool = state.database.pool();
    let owner = MacroAggregator::find_user(pool, &username).await?;
    authorize(&user, Action::View, &owner)?;

    let summary = MacroAggregator::summarize(pool, &owner).await?;
    Ok(Json(summary))
}
