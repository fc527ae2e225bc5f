use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::*;
use crate::products::StorageErrorExt;
use crate::state::AppState;
use crate::utils::{hash, jwt};

fn issue_token(state: &AppState, user: &user::Model) -> Result<String, AppError> {
    jwt::sign(&state.config.auth, user)
        .map_err(|e| AppError::Internal(format!("Token signing error: {e}")))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email.trim().to_lowercase()),
        password: Set(hash),
        full_name: Set(payload.full_name.trim().to_string()),
        is_active: Set(true),
        roles: Set(vec![user::DEFAULT_ROLE.to_string()].into()),
        created_at: Set(Utc::now()),
    };

    let user = new_user.insert(&state.db).await.map_err(|e| {
        if e.is_unique_violation() {
            tracing::debug!("Registration race condition: unique constraint caught on insert");
            AppError::Conflict("Email is already registered".into())
        } else {
            AppError::from(e)
        }
    })?;

    let token = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// Handle user login.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in with email and password",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong credentials or inactive account (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login_request(&payload)?;

    let email = payload.email.trim().to_lowercase();
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !hash::verify_password(&payload.password, &user.password) || !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse::new(user, token)))
}

/// Return the caller's profile with a freshly signed token.
#[utoipa::path(
    get,
    path = "/check-status",
    tag = "Auth",
    operation_id = "checkAuthStatus",
    summary = "Refresh the current session",
    responses(
        (status = 200, description = "Current user", body = AuthResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn check_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::TokenInvalid)?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse::new(user, token)))
}
