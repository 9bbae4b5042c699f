use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Signed payload carried inside a bearer token.
///
/// Identifies the user and bounds the token's lifetime. `jti` is random per
/// issuance so two tokens minted for the same user in the same second differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claim {
    /// Owning user id
    #[serde(rename = "sub")]
    pub user_id: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

impl Claim {
    /// Create a claim for a user, valid from `issued_at` until `expires_at`.
    pub fn new(user_id: i64, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Expiry as a timestamp, `None` if `exp` is out of range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_new_claim() {
        let now = Utc::now();
        let claim = Claim::new(42, now, now + Duration::hours(24));

        assert_eq!(claim.user_id, 42);
        assert_eq!(claim.exp - claim.iat, 24 * 60 * 60);
        assert!(!claim.jti.is_empty());
    }

    #[test]
    fn test_claims_have_distinct_ids() {
        let now = Utc::now();
        let first = Claim::new(1, now, now);
        let second = Claim::new(1, now, now);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_subject_serialized_as_sub() {
        let now = Utc::now();
        let claim = Claim::new(7, now, now);
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["sub"], 7);
    }

    #[test]
    fn test_expires_at_truncates_to_seconds() {
        let now = Utc::now();
        let claim = Claim::new(1, now, now);
        assert_eq!(claim.expires_at().unwrap().timestamp(), now.timestamp());
    }
}
