//! Seed records and seeding configuration.

use vidtube_models::UserId;

/// Domain of every seeded email address; used to find seeded rows again.
pub const SEED_EMAIL_DOMAIN: &str = "seed.vidtube.dev";

pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar: String,
    pub password_hash: String,
}

pub struct TweetSeed {
    pub owner_id: UserId,
    pub content: String,
}

pub struct PlaylistSeed {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub is_private: bool,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub users: usize,
    pub tweets_per_user: usize,
    /// Plain-text password shared by every seeded user
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 10,
            tweets_per_user: 5,
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn new(users: usize) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn with_tweets_per_user(mut self, tweets_per_user: usize) -> Self {
        self.tweets_per_user = tweets_per_user;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn total_tweets(&self) -> usize {
        self.users * self.tweets_per_user
    }
}
