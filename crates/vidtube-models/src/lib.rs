//! # Vidtube Models
//!
//! Database rows, request DTOs and response bodies for the Vidtube API.
//!
//! # Modules
//!
//! - [`ids`]: typed `Uuid` identifiers
//! - [`ownership`]: the [`Owned`] trait and [`authorize_owner`]
//! - [`auth`]: login, refresh and token responses
//! - [`users`]: profiles, credentials, channel pages and watch history
//! - [`videos`], [`tweets`], [`comments`], [`playlists`]: owned content
//! - [`likes`], [`subscriptions`]: toggle relations
//! - [`dashboard`]: channel statistics
//!
//! Rows derive `sqlx::FromRow`; projections never include the password hash
//! or the stored refresh token except for [`UserCredentials`].

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod ids;
pub mod likes;
pub mod ownership;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;

pub use auth::{LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest, TokenResponse};
pub use comments::{Comment, CommentDto, PaginatedComments};
pub use dashboard::ChannelStats;
pub use ids::{CommentId, LikeId, PlaylistId, SubscriptionId, TweetId, UserId, VideoId};
pub use likes::{Like, LikeTarget, ToggleLikeResponse};
pub use ownership::{Owned, authorize_owner};
pub use playlists::{CreatePlaylistDto, Playlist, PlaylistWithVideos, UpdatePlaylistDto};
pub use subscriptions::{ChannelSummary, Subscription, ToggleSubscriptionResponse};
pub use tweets::{Tweet, TweetDto};
pub use users::{
    ChangePasswordDto, ChannelProfile, RegisterUserDto, UpdateAccountDto, User, UserCredentials,
    WatchHistoryEntry,
};
pub use videos::{CreateVideoDto, UpdateVideoDto, Video};
