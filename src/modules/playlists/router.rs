use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use super::controller::{
    add_video_to_playlist, create_playlist, delete_playlist, get_playlist, get_user_playlists,
    remove_video_from_playlist, toggle_playlist_privacy, update_playlist,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn init_playlists_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_playlist))
        .route(
            "/{playlist_id}",
            patch(update_playlist).delete(delete_playlist),
        )
        .route("/{playlist_id}/toggle-privacy", patch(toggle_playlist_privacy))
        .route(
            "/{playlist_id}/videos/{video_id}",
            patch(add_video_to_playlist).delete(remove_video_from_playlist),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/{playlist_id}", get(get_playlist))
        .route("/user/{username}", get(get_user_playlists))
        .merge(protected)
}
