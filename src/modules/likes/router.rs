use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{
    get_liked_videos, toggle_comment_like, toggle_tweet_like, toggle_video_like,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Every likes route requires a session.
pub fn init_likes_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/toggle/video/{video_id}", post(toggle_video_like))
        .route("/toggle/comment/{comment_id}", post(toggle_comment_like))
        .route("/toggle/tweet/{tweet_id}", post(toggle_tweet_like))
        .route("/videos", get(get_liked_videos))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
