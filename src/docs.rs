use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use vidtube_core::{ErrorBody, PageMeta, PageParams};
use vidtube_models::users::RegisterUserForm;
use vidtube_models::videos::CreateVideoForm;
use vidtube_models::{
    ChangePasswordDto, ChannelProfile, ChannelStats, ChannelSummary, Comment, CommentDto,
    CreatePlaylistDto, LoginRequest, LoginResponse, MessageResponse, PaginatedComments, Playlist,
    PlaylistWithVideos, RefreshTokenRequest, ToggleLikeResponse, ToggleSubscriptionResponse,
    TokenResponse, Tweet, TweetDto, UpdateAccountDto, UpdatePlaylistDto, UpdateVideoDto, User,
    Video, WatchHistoryEntry,
};

use crate::modules::auth::cookies::ACCESS_TOKEN_COOKIE;
use crate::modules::healthcheck::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::healthcheck::controller::healthcheck,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_access_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::change_password,
        crate::modules::users::controller::register_user,
        crate::modules::users::controller::get_current_user,
        crate::modules::users::controller::update_account,
        crate::modules::users::controller::update_avatar,
        crate::modules::users::controller::update_cover_image,
        crate::modules::users::controller::get_channel_profile,
        crate::modules::users::controller::get_watch_history,
        crate::modules::videos::controller::publish_video,
        crate::modules::videos::controller::get_video,
        crate::modules::videos::controller::update_video,
        crate::modules::videos::controller::delete_video,
        crate::modules::videos::controller::toggle_publish_status,
        crate::modules::tweets::controller::create_tweet,
        crate::modules::tweets::controller::get_user_tweets,
        crate::modules::tweets::controller::get_tweet,
        crate::modules::tweets::controller::update_tweet,
        crate::modules::tweets::controller::delete_tweet,
        crate::modules::comments::controller::get_video_comments,
        crate::modules::comments::controller::add_comment,
        crate::modules::comments::controller::update_comment,
        crate::modules::comments::controller::delete_comment,
        crate::modules::likes::controller::toggle_video_like,
        crate::modules::likes::controller::toggle_comment_like,
        crate::modules::likes::controller::toggle_tweet_like,
        crate::modules::likes::controller::get_liked_videos,
        crate::modules::subscriptions::controller::toggle_subscription,
        crate::modules::subscriptions::controller::get_channel_subscribers,
        crate::modules::subscriptions::controller::get_subscribed_channels,
        crate::modules::playlists::controller::create_playlist,
        crate::modules::playlists::controller::get_playlist,
        crate::modules::playlists::controller::get_user_playlists,
        crate::modules::playlists::controller::update_playlist,
        crate::modules::playlists::controller::delete_playlist,
        crate::modules::playlists::controller::toggle_playlist_privacy,
        crate::modules::playlists::controller::add_video_to_playlist,
        crate::modules::playlists::controller::remove_video_from_playlist,
        crate::modules::dashboard::controller::get_channel_stats,
        crate::modules::dashboard::controller::get_channel_videos,
    ),
    components(
        schemas(
            ErrorBody,
            PageMeta,
            PageParams,
            HealthResponse,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            TokenResponse,
            MessageResponse,
            ChangePasswordDto,
            User,
            RegisterUserForm,
            UpdateAccountDto,
            ChannelProfile,
            WatchHistoryEntry,
            Video,
            CreateVideoForm,
            UpdateVideoDto,
            Tweet,
            TweetDto,
            Comment,
            CommentDto,
            PaginatedComments,
            ToggleLikeResponse,
            ChannelSummary,
            ToggleSubscriptionResponse,
            Playlist,
            PlaylistWithVideos,
            CreatePlaylistDto,
            UpdatePlaylistDto,
            ChannelStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Healthcheck", description = "Service liveness"),
        (name = "Authentication", description = "Login, token refresh and logout"),
        (name = "Users", description = "Accounts, channels and watch history"),
        (name = "Videos", description = "Video upload and management"),
        (name = "Tweets", description = "Short text posts"),
        (name = "Comments", description = "Comments on videos"),
        (name = "Likes", description = "Likes on videos, comments and tweets"),
        (name = "Subscriptions", description = "Channel subscriptions"),
        (name = "Playlists", description = "User playlists"),
        (name = "Dashboard", description = "Channel statistics")
    ),
    info(
        title = "Vidtube API",
        version = "0.1.0",
        description = "Video sharing backend built with Rust, Axum and PostgreSQL. Sessions use JWT access and refresh tokens delivered as cookies or bearer tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ACCESS_TOKEN_COOKIE))),
            );
        }
    }
}
