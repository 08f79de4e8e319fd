use axum::{Router, routing::post};

use super::controller::{login, logout, refresh, revoke, signup, verify};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/revoke", post(revoke))
        .route("/verify", post(verify))
}
