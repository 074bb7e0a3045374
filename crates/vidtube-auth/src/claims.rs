//! JWT payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

/// Claims embedded in a refresh token.
///
/// `jti` makes every issued token unique, so a rotation performed within the
/// same second as the previous one still yields a different value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID
    pub id: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_wire_format() {
        let claims = AccessTokenClaims {
            id: Uuid::from_u128(1),
            email: "ana@example.com".to_string(),
            username: "ana".to_string(),
            exp: 1_700_000_900,
            iat: 1_700_000_000,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000001");
        assert_eq!(json["username"], "ana");
        assert_eq!(json["exp"], 1_700_000_900);
    }

    #[test]
    fn test_refresh_claims_carry_only_identity() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000002","exp":10,"iat":5,"jti":"abc"}"#;
        let claims: RefreshTokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.id, Uuid::from_u128(2));
        assert_eq!(claims.jti, "abc");
    }
}
