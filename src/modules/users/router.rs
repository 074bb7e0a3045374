use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};

use super::controller::{
    get_channel_profile, get_current_user, get_watch_history, register_user, update_account,
    update_avatar, update_cover_image,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_users_router(state: &AppState) -> Router<AppState> {
    let upload_limit = DefaultBodyLimit::max(state.config.server.upload_body_limit);

    let protected = Router::new()
        .route("/current-user", get(get_current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar).layer(upload_limit))
        .route("/cover-image", patch(update_cover_image).layer(upload_limit))
        .route("/watch-history", get(get_watch_history))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", post(register_user).layer(upload_limit))
        .route("/channel/{username}", get(get_channel_profile))
        .merge(protected)
}
