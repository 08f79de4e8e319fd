use axum::Json;
use axum::extract::State;
use tracing::instrument;

use campus_core::AppError;
use campus_models::User;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

/// Get the current user's account
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 400, description = "Malformed authorization header", body = ErrorResponse),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.0.sub))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state.auth.current_user(&auth_user.0).await?;
    Ok(Json(user))
}
