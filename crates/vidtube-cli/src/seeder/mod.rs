//! Development data: users, each with tweets and a playlist.

pub mod content;
pub mod models;
pub mod users;

use rand::Rng;
use rand::distributions::Alphanumeric;
use sqlx::PgPool;
use std::time::Instant;
use vidtube_core::hash_password;

pub use models::{SEED_EMAIL_DOMAIN, SeedConfig};

use crate::CliResult;

/// Summary of a seeding run.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub users: usize,
    pub tweets: u64,
    pub playlists: u64,
}

pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> CliResult<SeedReport> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} users with {} tweets each...",
        config.users, config.tweets_per_user
    );

    // Hash once; every seeded user shares the password.
    let password_hash = hash_password(&config.password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let run_tag: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();

    let user_seeds = users::generate_users(config.users, &run_tag, &password_hash);
    let user_ids = users::seed_users(db, &user_seeds).await?;

    let tweets = content::generate_tweets(&user_ids, config.tweets_per_user);
    let tweet_count = content::seed_tweets(db, &tweets).await?;

    let playlists = content::generate_playlists(&user_ids);
    let playlist_count = content::seed_playlists(db, &playlists).await?;

    println!("✅ Seeding finished in {:?}", start_time.elapsed());

    Ok(SeedReport {
        users: user_ids.len(),
        tweets: tweet_count,
        playlists: playlist_count,
    })
}

pub async fn clear_all(db: &PgPool) -> CliResult<u64> {
    users::clear_users(db).await
}
