use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use super::controller::{create_tweet, delete_tweet, get_tweet, get_user_tweets, update_tweet};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_tweets_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_tweet))
        .route("/{tweet_id}", patch(update_tweet).delete(delete_tweet))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/user/{username}", get(get_user_tweets))
        .route("/{tweet_id}", get(get_tweet))
        .merge(protected)
}
