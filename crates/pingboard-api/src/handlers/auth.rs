//! Auth handlers — register, login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use pingboard_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let min_len = state.config.auth.password_min_length;
    if req.password.len() < min_len {
        return Err(AppError::validation(format!(
            "Password must be at least {min_len} characters"
        ))
        .into());
    }

    let hash = state.password_hasher.hash_password(&req.password)?;
    state.users.register(&req.username, hash)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(MessageResponse {
            message: "User registered successfully".to_string(),
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .users
        .get(&req.username)
        .ok_or_else(|| AppError::authentication("Unknown username or wrong password"))?;

    let valid = state
        .password_hasher
        .verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::authentication("Unknown username or wrong password").into());
    }

    let issued = state.jwt_encoder.issue(&user.id)?;
    tracing::info!(username = %user.id, "User logged in");

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        username: user.id.into_string(),
    })))
}
