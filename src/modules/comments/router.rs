use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use super::controller::{add_comment, delete_comment, get_video_comments, update_comment};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_comments_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/video/{video_id}", post(add_comment))
        .route("/{comment_id}", patch(update_comment).delete(delete_comment))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/video/{video_id}", get(get_video_comments))
        .merge(protected)
}
