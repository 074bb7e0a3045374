use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use vidtube_core::{AppError, ErrorBody};
use vidtube_models::{Tweet, TweetDto, TweetId};

use super::service::TweetService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Post a tweet
#[utoipa::path(
    post,
    path = "/api/v1/tweets",
    request_body = TweetDto,
    responses(
        (status = 201, description = "Tweet created", body = Tweet),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Tweets"
)]
#[instrument(skip(state))]
pub async fn create_tweet(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<TweetDto>,
) -> Result<(StatusCode, Json<Tweet>), AppError> {
    let tweet = TweetService::create(&state.db, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(tweet)))
}

/// List a user's tweets
#[utoipa::path(
    get,
    path = "/api/v1/tweets/user/{username}",
    params(("username" = String, Path, description = "Author username")),
    responses(
        (status = 200, description = "Tweets, newest first", body = Vec<Tweet>),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "Tweets"
)]
#[instrument(skip(state))]
pub async fn get_user_tweets(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Tweet>>, AppError> {
    let tweets = TweetService::list_by_username(&state.db, &username).await?;
    Ok(Json(tweets))
}

#[utoipa::path(
    get,
    path = "/api/v1/tweets/{tweet_id}",
    params(("tweet_id" = TweetId, Path, description = "Tweet id")),
    responses(
        (status = 200, description = "Tweet", body = Tweet),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    ),
    tag = "Tweets"
)]
#[instrument(skip(state))]
pub async fn get_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<TweetId>,
) -> Result<Json<Tweet>, AppError> {
    let tweet = TweetService::get(&state.db, tweet_id).await?;
    Ok(Json(tweet))
}

#[utoipa::path(
    patch,
    path = "/api/v1/tweets/{tweet_id}",
    params(("tweet_id" = TweetId, Path, description = "Tweet id")),
    request_body = TweetDto,
    responses(
        (status = 200, description = "Tweet updated", body = Tweet),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Tweets"
)]
#[instrument(skip(state))]
pub async fn update_tweet(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(tweet_id): Path<TweetId>,
    ValidatedJson(dto): ValidatedJson<TweetDto>,
) -> Result<Json<Tweet>, AppError> {
    let tweet = TweetService::update(&state.db, tweet_id, auth_user.id(), dto).await?;
    Ok(Json(tweet))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tweets/{tweet_id}",
    params(("tweet_id" = TweetId, Path, description = "Tweet id")),
    responses(
        (status = 204, description = "Tweet deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Tweets"
)]
#[instrument(skip(state))]
pub async fn delete_tweet(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(tweet_id): Path<TweetId>,
) -> Result<StatusCode, AppError> {
    TweetService::delete(&state.db, tweet_id, auth_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
