use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{get_channel_subscribers, get_subscribed_channels, toggle_subscription};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_subscriptions_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/channel/{channel_id}/toggle", post(toggle_subscription))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/channel/{channel_id}/subscribers", get(get_channel_subscribers))
        .route("/user/{subscriber_id}/channels", get(get_subscribed_channels))
        .merge(protected)
}
