//! Tweets and playlists for seeded users.

use fake::Fake;
use fake::faker::lorem::en::{Sentence, Words};
use rand::Rng;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;
use vidtube_models::UserId;

use super::models::{PlaylistSeed, TweetSeed};
use crate::CliResult;

const TWEET_MAX_CHARS: usize = 280;

pub fn generate_tweets(owners: &[UserId], per_user: usize) -> Vec<TweetSeed> {
    owners
        .par_iter()
        .flat_map(|&owner_id| {
            (0..per_user)
                .map(|_| {
                    let mut content: String = Sentence(4..20).fake();
                    content.truncate(TWEET_MAX_CHARS);
                    TweetSeed { owner_id, content }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// One playlist per user; roughly one in five is private.
pub fn generate_playlists(owners: &[UserId]) -> Vec<PlaylistSeed> {
    owners
        .par_iter()
        .map(|&owner_id| {
            let words: Vec<String> = Words(1..3).fake();
            PlaylistSeed {
                owner_id,
                name: capitalize_words(&words),
                description: Sentence(3..10).fake(),
                is_private: rand::thread_rng().gen_bool(0.2),
            }
        })
        .collect()
}

fn capitalize_words(words: &[String]) -> String {
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub async fn seed_tweets(db: &PgPool, tweets: &[TweetSeed]) -> CliResult<u64> {
    let start_time = Instant::now();
    println!("🐦 Seeding {} tweets...", tweets.len());

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in tweets.chunks(2000) {
        let mut query = String::from("INSERT INTO tweets (owner_id, content) VALUES ");
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
        }

        let mut q = sqlx::query(&query);
        for tweet in chunk {
            q = q.bind(tweet.owner_id).bind(&tweet.content);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    println!("   ✓ Inserted {} tweets in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}

pub async fn seed_playlists(db: &PgPool, playlists: &[PlaylistSeed]) -> CliResult<u64> {
    let start_time = Instant::now();
    println!("🎵 Seeding {} playlists...", playlists.len());

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in playlists.chunks(1000) {
        let mut query =
            String::from("INSERT INTO playlists (owner_id, name, description, is_private) VALUES ");
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            let p = i * 4;
            query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
        }

        let mut q = sqlx::query(&query);
        for playlist in chunk {
            q = q
                .bind(playlist.owner_id)
                .bind(&playlist.name)
                .bind(&playlist.description)
                .bind(playlist.is_private);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    println!("   ✓ Inserted {} playlists in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}
