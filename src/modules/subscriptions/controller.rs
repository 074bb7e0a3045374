use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::{ChannelSummary, ToggleSubscriptionResponse, UserId};

use super::service::SubscriptionService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Subscribe to or unsubscribe from a channel
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/channel/{channel_id}/toggle",
    params(("channel_id" = UserId, Path, description = "Channel owner id")),
    responses(
        (status = 200, description = "Subscription toggled", body = ToggleSubscriptionResponse),
        (status = 400, description = "Cannot subscribe to yourself", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Channel not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Subscriptions"
)]
#[instrument(skip(state))]
pub async fn toggle_subscription(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(channel_id): Path<UserId>,
) -> Result<Json<ToggleSubscriptionResponse>, AppError> {
    let subscribed = SubscriptionService::toggle(&state.db, auth_user.id(), channel_id).await?;
    Ok(Json(ToggleSubscriptionResponse { subscribed }))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/channel/{channel_id}/subscribers",
    params(("channel_id" = UserId, Path, description = "Channel owner id")),
    responses(
        (status = 200, description = "Subscribers of the channel", body = Vec<ChannelSummary>),
        (status = 404, description = "Channel not found", body = ErrorBody)
    ),
    tag = "Subscriptions"
)]
#[instrument(skip(state))]
pub async fn get_channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<UserId>,
) -> Result<Json<Vec<ChannelSummary>>, AppError> {
    let subscribers = SubscriptionService::subscribers(&state.db, channel_id).await?;
    Ok(Json(subscribers))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/user/{subscriber_id}/channels",
    params(("subscriber_id" = UserId, Path, description = "Subscriber id")),
    responses(
        (status = 200, description = "Channels the user subscribes to", body = Vec<ChannelSummary>),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Subscriptions"
)]
#[instrument(skip(state))]
pub async fn get_subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<UserId>,
) -> Result<Json<Vec<ChannelSummary>>, AppError> {
    let channels = SubscriptionService::subscribed_channels(&state.db, subscriber_id).await?;
    Ok(Json(channels))
}
