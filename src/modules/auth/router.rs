use axum::{Router, middleware, routing::post};

use super::controller::{change_password, login_user, logout_user, refresh_access_token};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Session routes, mounted under `/users` next to the profile routes.
pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout_user))
        .route("/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/login", post(login_user))
        .route("/refresh-token", post(refresh_access_token))
        .merge(protected)
}
