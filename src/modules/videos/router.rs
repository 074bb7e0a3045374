use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};

use super::controller::{
    delete_video, get_video, publish_video, toggle_publish_status, update_video,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_videos_router(state: &AppState) -> Router<AppState> {
    let upload_limit = DefaultBodyLimit::max(state.config.server.upload_body_limit);

    let protected = Router::new()
        .route("/", post(publish_video).layer(upload_limit))
        .route("/{video_id}", patch(update_video).delete(delete_video))
        .route("/{video_id}/toggle-publish", patch(toggle_publish_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // GET shares its path with the protected PATCH/DELETE, so it is merged
    // separately without the auth layer.
    Router::new()
        .route("/{video_id}", get(get_video))
        .merge(protected)
}
