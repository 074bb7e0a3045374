//! # Vidtube CLI
//!
//! Account administration and database seeding for development.
//!
//! ```ignore
//! use vidtube_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(20).with_tweets_per_user(5);
//! seed_all(&pool, &config).await?;
//! ```

pub mod accounts;
pub mod seeder;

/// Error type shared by the CLI operations.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
