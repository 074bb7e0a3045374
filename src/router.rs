use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::comments::router::init_comments_router;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::healthcheck::router::init_healthcheck_router;
use crate::modules::likes::router::init_likes_router;
use crate::modules::playlists::router::init_playlists_router;
use crate::modules::subscriptions::router::init_subscriptions_router;
use crate::modules::tweets::router::init_tweets_router;
use crate::modules::users::router::init_users_router;
use crate::modules::videos::router::init_videos_router;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/healthcheck", init_healthcheck_router())
        .nest(
            "/users",
            init_auth_router(&state).merge(init_users_router(&state)),
        )
        .nest("/videos", init_videos_router(&state))
        .nest("/tweets", init_tweets_router(&state))
        .nest("/comments", init_comments_router(&state))
        .nest("/likes", init_likes_router(&state))
        .nest("/subscriptions", init_subscriptions_router(&state))
        .nest("/playlists", init_playlists_router(&state))
        .nest("/dashboard", init_dashboard_router());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api/v1", api)
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(state.config.server.json_body_limit))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
}

/// Credentialed CORS for the configured origins so browsers send the
/// session cookies.
fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
