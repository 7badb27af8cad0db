use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::{jwt, password};
use crate::models::user::{JwtResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    request.validate()?;

    if store::users::exists_by_username(&state.pool, &request.username).await? {
        return Err(AppError::ValidationError(format!(
            "Username is already taken: {}",
            request.username
        )));
    }

    let password_hash = password::hash_password(&request.password)?;
    let user = store::users::insert(
        &state.pool,
        &request.username,
        &password_hash,
        request.bio.as_deref(),
    )
    .await?;

    tracing::info!(username = %user.username, "Registered new user");
    Ok(created(UserResponse::from(user), "User registered"))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let user = store::users::find_by_username(&state.pool, &request.username)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

    if !password::verify_password(&user.password_hash, &request.password) {
        return Err(AppError::AuthError(
            "Invalid username or password".to_string(),
        ));
    }

    let token = jwt::generate_token(
        &user.username,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    Ok(success(
        JwtResponse {
            token,
            user_id: user.id,
            username: user.username,
        },
        "Login successful",
    ))
}

#[derive(Deserialize)]
pub struct ValidateParams {
    pub token: String,
}

/// POST /api/auth/validate
pub async fn validate(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
) -> Result<Response, AppError> {
    jwt::decode_token(&params.token, &state.config.jwt_secret)?;
    Ok(empty_success("Token is valid"))
}
