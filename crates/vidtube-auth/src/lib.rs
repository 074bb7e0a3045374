//! # Vidtube Auth
//!
//! The session-token lifecycle and the ownership policy.
//!
//! - [`claims`]: payloads of access and refresh tokens
//! - [`jwt`]: issuing and verifying tokens
//! - [`policy`]: the single owner-vs-caller authorization rule
//!
//! # Token Types
//!
//! - **Access token** ([`AccessTokenClaims`]): short-lived, carries
//!   `{id, email, username}`, never stored server-side
//! - **Refresh token** ([`RefreshTokenClaims`]): long-lived, carries `{id}`,
//!   stored on the user record and rotated on every use
//!
//! The two kinds are signed with different secrets, so one can never be
//! accepted in place of the other.
//!
//! # Example
//!
//! ```ignore
//! use vidtube_auth::{issue_token_pair, verify_access_token};
//!
//! let pair = issue_token_pair(user_id, "ana@example.com", "ana", &config.jwt)?;
//! let claims = verify_access_token(&pair.access_token, &config.jwt)?;
//! assert_eq!(claims.id, user_id);
//! ```

pub mod claims;
pub mod jwt;
pub mod policy;

pub use claims::{AccessTokenClaims, RefreshTokenClaims};
pub use jwt::{
    TokenError, TokenPair, create_access_token, create_refresh_token, issue_token_pair, verify,
    verify_access_token, verify_refresh_token,
};
pub use policy::{Access, check_owner};
