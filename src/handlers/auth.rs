use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::{JwtService, PasswordService},
    database::queries::UserQueries,
    errors::{AppError, Result},
    handlers::AppState,
    middleware::AppJson,
    models::{AuthResponse, CreateUserRequest, LoginRequest, User, UserResponse},
    utils::validate_username,
};

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse> {
    let jwt_service = JwtService::new(&state.config.jwt_secret);
    let access_token = jwt_service.generate_access_token(user.id, &user.username)?;
    let refresh_token = jwt_service.generate_refresh_token(user.id, &user.username)?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: UserResponse::from(user),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Invalid username, weak password or username taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_username(&request.username)?;

    if let Some(email) = request.email.as_deref() {
        if !email.contains('@') {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
    }

    PasswordService::validate_password_strength(&request.password)?;

    if UserQueries::find_by_username(state.database.pool(), &request.username).await?.is_some() {
        return Err(AppError::Validation(format!(
            "Username '{}' is already taken",
            request.username
        )));
    }

    let password_hash = PasswordService::hash_password(&request.password, state.config.bcrypt_cost)?;

    let user = UserQueries::create_user(
        state.database.pool(),
        &request.username,
        request.email.as_deref(),
        &password_hash,
    ).await?;

    tracing::info!(username = %user.username, "user registered");
    let response = issue_tokens(&state, user)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "data": response
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    let user = UserQueries::find_by_username(state.database.pool(), &request.username)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))?;

    if !PasswordService::verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    let response = issue_tokens(&state, user)?;

    Ok(Json(json!({
        "message": "Login successful",
        "data": response
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "New access token"),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(request): AppJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>> {
    let refresh_token = request
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::Validation("Refresh token is required".to_string()))?;

    let jwt_service = JwtService::new(&state.config.jwt_secret);
    let claims = jwt_service.verify_refresh_token(refresh_token)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Auth("Invalid user ID in token".to_string()))?;

    let user = UserQueries::find_by_id(state.database.pool(), user_id)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let access_token = jwt_service.generate_access_token(user.id, &user.username)?;

    Ok(Json(json!({
        "message": "Token refreshed successfully",
        "data": {
            "access_token": access_token,
            "user": UserResponse::from(user)
        }
    })))
}

#[utoipa::path(post, path = "/api/v1/auth/logout", tag = "auth", responses((status = 200, description = "Logged out")))]
pub async fn logout() -> Result<Json<serde_json::Value>> {
    // Tokens are stateless; the client discards them.
    Ok(Json(json!({
        "message": "Logged out successfully"
    })))
}
