use axum::{Router, routing::get};

use super::controller::{get_channel_stats, get_channel_videos};
use crate::state::AppState;

pub fn init_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/channel/{channel_id}/stats", get(get_channel_stats))
        .route("/channel/{channel_id}/videos", get(get_channel_videos))
}
