use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::liveness,
        crate::handlers::health::readiness,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::refresh,
        crate::handlers::auth::logout,
        crate::handlers::foods::list_foods,
        crate::handlers::foods::create_food,
        crate::handlers::foods::get_food,
        crate::handlers::foods::update_food,
        crate::handlers::foods::delete_food,
        crate::handlers::meals::list_meals,
        crate::handlers::meals::create_meal,
        crate::handlers::meals::get_meal,
        crate::handlers::meals::update_meal,
        crate::handlers::meals::delete_meal,
        crate::handlers::meal_foods::list_meal_foods,
        crate::handlers::meal_foods::create_meal_food,
        crate::handlers::meal_foods::get_meal_food,
        crate::handlers::meal_foods::update_meal_food,
        crate::handlers::meal_foods::delete_meal_food,
        crate::handlers::common_foods::list_common_foods,
        crate::handlers::common_foods::add_common_food,
        crate::handlers::summary::user_meals,
        crate::handlers::nutrients::save_nutrient_data,
        crate::handlers::nutrients::list_nutrient_dates,
        crate::handlers::nutrients::get_nutrient_data,
    ),
    components(
        schemas(
            crate::models::CreateUserRequest,
            crate::models::LoginRequest,
            crate::models::FoodInput,
            crate::models::MealInput,
            crate::models::MealFoodInput,
            crate::models::Macros,
        )
    ),
    tags(
        (name = "auth", description = "Registration and tokens"),
        (name = "foods", description = "Foods with macros per 100 g"),
        (name = "meals", description = "Meal types"),
        (name = "meal-foods", description = "Quantities of foods in meals"),
        (name = "common-foods", description = "Shared food catalog"),
        (name = "summary", description = "Aggregated macronutrients"),
        (name = "nutrients", description = "Daily nutrient snapshots"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Nutrition Tracker API",
        version = "0.1.0",
        description = "Foods, meals and daily macronutrient totals"
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
