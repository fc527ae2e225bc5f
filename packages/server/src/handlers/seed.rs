use axum::{Json, extract::State};
use tracing::instrument;

use crate::entity::user::ADMIN_ROLE;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::seed::SeedResponse;
use crate::seed;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Seed",
    operation_id = "runSeed",
    summary = "Reset the catalog to demo data",
    description = "Deletes every product and inserts the demo catalog. Requires the `admin` role and is refused when the server runs in production.",
    responses(
        (status = 200, description = "Catalog reset", body = SeedResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn run_seed(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, AppError> {
    auth_user.require_role(&[ADMIN_ROLE])?;
    if state.config.app.is_production() {
        return Err(AppError::PermissionDenied);
    }

    let summary = seed::reset_catalog(&state.db, auth_user.user_id).await?;
    Ok(Json(summary))
}
