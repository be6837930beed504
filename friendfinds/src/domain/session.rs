//! Authenticated session context.
//!
//! The cache and the remote store adapters are scoped to one signed-in user.
//! Instead of reading ambient auth state, callers build a [`Session`] after
//! sign-in and hand it to the components that need it; dropping or clearing
//! those components is how sign-out is expressed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors returned when building session values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionValidationError {
    /// The user identifier was empty.
    #[error("user id must not be empty")]
    EmptyUserId,
    /// The user identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidUserId,
    /// The access token was blank.
    #[error("access token must not be empty")]
    EmptyAccessToken,
}

/// Stable identifier of the owning user, stored as a UUID.
///
/// The text form is always the lowercase hyphenated rendering, so ids that
/// differ only in letter case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::UserId;
    ///
    /// let id = UserId::new("11111111-1111-1111-1111-111111111111").expect("valid id");
    /// assert_eq!(id.as_ref(), "11111111-1111-1111-1111-111111111111");
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, SessionValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, SessionValidationError> {
        if id.is_empty() {
            return Err(SessionValidationError::EmptyUserId);
        }
        if id.trim() != id {
            return Err(SessionValidationError::InvalidUserId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| SessionValidationError::InvalidUserId)?;
        Ok(Self(parsed, parsed.to_string()))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = SessionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Bearer token issued by the hosted auth provider.
///
/// The token is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Construct a token, rejecting blank input.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionValidationError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(SessionValidationError::EmptyAccessToken);
        }
        Ok(Self(token))
    }

    /// Raw token text for transport headers.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Signed-in session the recommendation cache is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    access_token: AccessToken,
}

impl Session {
    /// Bind a user identity to its access token.
    pub fn new(user_id: UserId, access_token: AccessToken) -> Self {
        Self {
            user_id,
            access_token,
        }
    }

    /// Owning user of every record visible through this session.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Token presented to the remote store.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", SessionValidationError::EmptyUserId)]
    #[case("not-a-uuid", SessionValidationError::InvalidUserId)]
    #[case(" 11111111-1111-1111-1111-111111111111", SessionValidationError::InvalidUserId)]
    fn invalid_user_ids_are_rejected(#[case] raw: &str, #[case] expected: SessionValidationError) {
        let err = UserId::new(raw).expect_err("invalid id must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn user_id_round_trips_through_serde() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).expect("serialise id");
        let back: UserId = serde_json::from_str(&json).expect("deserialise id");
        assert_eq!(back, id);
    }

    #[rstest]
    fn user_ids_differing_in_case_are_equal() {
        let upper = UserId::new("AAAAAAAA-1111-4111-8111-111111111111").expect("valid id");
        let lower = UserId::new("aaaaaaaa-1111-4111-8111-111111111111").expect("valid id");

        assert_eq!(upper, lower);
        assert_eq!(upper.as_ref(), "aaaaaaaa-1111-4111-8111-111111111111");
        let hashed: std::collections::HashSet<_> = [upper, lower].into_iter().collect();
        assert_eq!(hashed.len(), 1);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_tokens_are_rejected(#[case] raw: &str) {
        let err = AccessToken::new(raw).expect_err("blank token must fail");
        assert_eq!(err, SessionValidationError::EmptyAccessToken);
    }

    #[rstest]
    fn token_debug_output_is_redacted() {
        let token = AccessToken::new("super-secret").expect("valid token");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
        assert_eq!(token.expose(), "super-secret");
    }
}
