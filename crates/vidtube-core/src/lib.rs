//! # Vidtube Core
//!
//! Core types shared by every Vidtube crate.
//!
//! - [`errors`]: [`AppError`] and the [`ErrorKind`] taxonomy, rendered as a uniform JSON body
//! - [`media`]: the [`MediaStore`] seam used for avatars, thumbnails and video files
//! - [`pagination`]: page/limit query parameters and response metadata
//! - [`password`]: bcrypt hashing and verification
//! - [`validation`]: custom `validator` rules shared by request DTOs
//!
//! # Example
//!
//! ```ignore
//! use vidtube_core::{AppError, hash_password};
//!
//! let hash = hash_password("correct horse battery staple")?;
//! let missing = AppError::not_found(anyhow::anyhow!("Video not found"));
//! ```

pub mod errors;
pub mod media;
pub mod pagination;
pub mod password;
pub mod validation;

pub use errors::{AppError, ErrorBody, ErrorKind};
pub use media::{LocalMediaStore, MediaError, MediaKind, MediaStore, StoredMedia};
pub use pagination::{PageMeta, PageParams};
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};
