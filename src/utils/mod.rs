//! Shared helpers for the HTTP layer.
//!
//! - [`cloudinary`]: the Cloudinary media store
//! - [`upload`]: staging multipart files before they reach the media store

pub mod cloudinary;
pub mod upload;
