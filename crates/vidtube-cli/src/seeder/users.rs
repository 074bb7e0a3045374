//! Fake users with unique usernames and emails.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use vidtube_models::UserId;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};
use crate::CliResult;

/// Usernames carry a random run tag and the index, so repeated seeding
/// never collides with earlier runs.
pub fn generate_users(count: usize, run_tag: &str, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user(idx, run_tag, password_hash))
        .collect()
}

fn generate_user(idx: usize, run_tag: &str, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let handle: String = first_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(12)
        .collect::<String>()
        .to_lowercase();
    let username = format!("{handle}_{run_tag}{idx}");

    UserSeed {
        email: format!("{username}@{SEED_EMAIL_DOMAIN}"),
        avatar: format!("https://api.dicebear.com/9.x/initials/svg?seed={username}"),
        fullname: format!("{first_name} {last_name}"),
        username,
        password_hash: password_hash.to_string(),
    }
}

pub async fn seed_users(db: &PgPool, users: &[UserSeed]) -> CliResult<Vec<UserId>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", users.len());

    let mut tx = db.begin().await?;

    // 5 params per user
    const BATCH_SIZE: usize = 1000;

    let mut ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;

    println!("   ✓ Inserted {} users in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> CliResult<Vec<UserId>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (username, email, fullname, avatar, avatar_public_id, password_hash) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, '', ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.fullname)
            .bind(&user.avatar)
            .bind(&user.password_hash);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes every seeded user. Their tweets, playlists and other rows go
/// with them through the foreign keys.
pub async fn clear_users(db: &PgPool) -> CliResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} users in {:?}", deleted, start_time.elapsed());
    Ok(deleted)
}
