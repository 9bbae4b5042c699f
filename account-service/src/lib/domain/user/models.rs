use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// `password_hash` is the stored Argon2 PHC string; it never leaves the
/// service.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(UserId(id)),
            Ok(id) => Err(UserIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(UserIdError::InvalidFormat(format!("{}: {}", s, e))),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Normalized to trimmed lowercase so that lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 255;

    /// Create a trimmed, non-empty name.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 255 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for storage.
///
/// Between 8 and 72 bytes; the upper bound is the hasher's input limit, so a
/// value of this type always hashes.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_BYTES: usize = 8;
    pub const MAX_BYTES: usize = auth::MAX_PASSWORD_BYTES;

    /// # Errors
    /// * `TooShort` - Fewer than 8 bytes
    /// * `TooLong` - More than 72 bytes
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.len();
        if length < Self::MIN_BYTES {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_BYTES,
                actual: length,
            })
        } else if length > Self::MAX_BYTES {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_BYTES,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to create a new user with domain types
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Plain text password (hashed by the credential store)
    pub password: Password,
}

impl CreateUserCommand {
    pub fn new(
        email: EmailAddress,
        first_name: PersonName,
        last_name: PersonName,
        password: Password,
    ) -> Self {
        Self {
            email,
            first_name,
            last_name,
            password,
        }
    }
}

/// Command to update an existing user's profile.
///
/// Only provided fields are changed. Passwords change through
/// `reset_password`, never through an update.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub email: Option<EmailAddress>,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_from_string() {
        assert_eq!(UserId::from_string("42"), Ok(UserId(42)));
        assert!(UserId::from_string("0").is_err());
        assert!(UserId::from_string("-3").is_err());
        assert!(UserId::from_string("abc").is_err());
    }

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_invalid() {
        let result = EmailAddress::new("not-an-email".to_string());
        assert!(matches!(result, Err(EmailError::InvalidFormat(_))));
    }

    #[test]
    fn test_person_name() {
        assert_eq!(PersonName::new("  Alice ".to_string()).unwrap().as_str(), "Alice");
        assert_eq!(PersonName::new("   ".to_string()), Err(NameError::Empty));
        assert!(matches!(
            PersonName::new("x".repeat(256)),
            Err(NameError::TooLong { max: 255, actual: 256 })
        ));
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("secret123".to_string()).is_ok());
        assert_eq!(
            Password::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        );
        assert_eq!(
            Password::new("p".repeat(73)),
            Err(PasswordPolicyError::TooLong { max: 72, actual: 73 })
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("secret123".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("secret123"));
    }
}
