pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    auth as auth_handlers, common_foods, docs, foods, health, meal_foods, meals, metrics,
    nutrients, summary, AppState,
};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/refresh", post(auth_handlers::refresh))
        .route("/auth/logout", post(auth_handlers::logout))
        .route("/foods", get(foods::list_foods).post(foods::create_food))
        .route(
            "/foods/:id",
            get(foods::get_food).put(foods::update_food).delete(foods::delete_food),
        )
        .route("/meals", get(meals::list_meals).post(meals::create_meal))
        .route(
            "/meals/:id",
            get(meals::get_meal).put(meals::update_meal).delete(meals::delete_meal),
        )
        .route(
            "/meal-foods",
            get(meal_foods::list_meal_foods).post(meal_foods::create_meal_food),
        )
        .route(
            "/meal-foods/:id",
            get(meal_foods::get_meal_food)
                .put(meal_foods::update_meal_food)
                .delete(meal_foods::delete_meal_food),
        )
        .route("/common-foods", get(common_foods::list_common_foods))
        .route("/common-foods/:id/add", post(common_foods::add_common_food))
        .route("/users/:username/meals", get(summary::user_meals))
        .route(
            "/nutrients/save",
            post(nutrients::save_nutrient_data).fallback(nutrients::invalid_request),
        )
        .route("/nutrients", get(nutrients::list_nutrient_dates))
        .route("/nutrients/:date", get(nutrients::get_nutrient_data))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    crate::middleware::metrics_middleware,
                )),
        )
        .with_state(state)
}
