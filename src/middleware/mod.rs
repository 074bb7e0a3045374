//! Request middleware.
//!
//! - [`auth`]: the session middleware, [`auth::AuthUser`] and optional sessions
//!
//! ```ignore
//! use axum::middleware;
//! use crate::middleware::auth::{AuthUser, require_auth};
//!
//! Router::new()
//!     .route("/current-user", get(current_user))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//!
//! async fn current_user(auth_user: AuthUser) -> Json<User> {
//!     Json(auth_user.0)
//! }
//! ```

pub mod auth;
