//! # Vidtube API
//!
//! A video sharing backend built with Rust, Axum and PostgreSQL. Users
//! upload videos, post tweets, comment, like, subscribe to channels and
//! curate playlists. Media files are stored in Cloudinary, or on local disk
//! when no Cloudinary account is configured.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Session extraction (cookie or bearer)
//! ├── modules/          # Feature modules
//! │   ├── auth/         # Login, refresh, logout, password change
//! │   ├── users/        # Registration, profile, channel, history
//! │   ├── videos/       # Upload, watch, publish toggle
//! │   ├── tweets/
//! │   ├── comments/
//! │   ├── likes/
//! │   ├── subscriptions/
//! │   ├── playlists/
//! │   ├── dashboard/    # Channel statistics
//! │   └── healthcheck/
//! └── utils/            # Multipart staging, Cloudinary client
//! ```
//!
//! Each feature module has a `controller.rs` (HTTP handlers), a
//! `service.rs` (queries and rules) and a `router.rs`. Models and DTOs live
//! in the `vidtube-models` crate.
//!
//! ## Sessions
//!
//! Login issues an access token and a refresh token, both JWTs signed with
//! separate secrets. They are set as `HttpOnly` cookies and also returned in
//! the body for clients that cannot use cookies. Protected routes accept
//! the `accessToken` cookie first and fall back to `Authorization: Bearer`.
//!
//! Only the latest refresh token of a user is valid. Every refresh rotates
//! it, so presenting an older one fails with `TokenMismatch`. Logout and
//! password changes clear it.
//!
//! ## Ownership
//!
//! Mutations of videos, tweets, comments and playlists load the row and
//! compare its owner with the caller: a missing row is `404`, someone
//! else's row is `403`.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:8000/swagger-ui`
//! - Scalar: `http://localhost:8000/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

pub use vidtube_auth;
pub use vidtube_config;
pub use vidtube_core;
pub use vidtube_db;
pub use vidtube_models;
