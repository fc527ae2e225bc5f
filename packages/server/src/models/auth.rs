use crate::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique email address; stored lowercased.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (6-50 characters, upper and lower case letters plus a digit or symbol).
    #[schema(example = "Abc123")]
    pub password: String,
    #[schema(example = "Alice Wonder")]
    pub full_name: String,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !domain.contains('@')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) || email.len() > 254 {
        return Err(AppError::Validation("Email must be a valid address".into()));
    }
    Ok(())
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_email(payload.email.trim())?;

    let password = &payload.password;
    let length = password.chars().count();
    if !(6..=50).contains(&length) {
        return Err(AppError::Validation(
            "Password must be 6-50 characters".into(),
        ));
    }
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit_or_symbol = password
        .chars()
        .any(|c| c.is_ascii_digit() || !c.is_alphanumeric());
    if !(has_upper && has_lower && has_digit_or_symbol) {
        return Err(AppError::Validation(
            "Password must have an uppercase letter, a lowercase letter and a number".into(),
        ));
    }

    if payload.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name must not be empty".into()));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Abc123")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Authenticated user's profile together with a bearer token.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub id: Uuid,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice Wonder")]
    pub full_name: String,
    pub is_active: bool,
    #[schema(example = json!(["user"]))]
    pub roles: Vec<String>,
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: crate::entity::user::Model, token: String) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            roles: user.roles.into(),
            token,
        }
    }
}
