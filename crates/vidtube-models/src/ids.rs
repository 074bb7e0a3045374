//! Typed identifiers.
//!
//! Each entity gets its own `Uuid` newtype so a `VideoId` cannot be passed
//! where a `UserId` is expected. Ids are transparent on the wire and in
//! Postgres.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a user, which is also their channel.
    UserId
);
define_id!(VideoId);
define_id!(TweetId);
define_id!(CommentId);
define_id!(PlaylistId);
define_id!(LikeId);
define_id!(SubscriptionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_random() {
        assert_ne!(VideoId::new(), VideoId::new());
    }

    #[test]
    fn test_value_equality() {
        let uuid = Uuid::new_v4();
        assert_eq!(UserId::from(uuid), UserId::from(uuid));
    }

    #[test]
    fn test_debug_names_the_type() {
        let id = PlaylistId::from(Uuid::from_u128(7));
        assert_eq!(
            format!("{id:?}"),
            "PlaylistId(00000000-0000-0000-0000-000000000007)"
        );
    }

    #[test]
    fn test_parse() {
        let id: TweetId = "12345678-1234-1234-1234-123456789abc".parse().unwrap();
        assert_eq!(
            id.into_inner(),
            Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc)
        );
        assert!("nope".parse::<TweetId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CommentId::from(Uuid::from_u128(1));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""00000000-0000-0000-0000-000000000001""#);
        let back: CommentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
