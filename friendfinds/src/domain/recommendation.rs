//! Recommendation entity model.
//!
//! A [`Recommendation`] is one suggestion a friend gave the user. Identity is
//! assigned by the remote store, `date` and `user_id` are fixed at creation,
//! and `used` only changes through the toggle mutation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use super::UserId;

/// Validation errors returned when constructing a [`RecommendationId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationIdError {
    /// The identifier was blank.
    #[error("recommendation id must not be empty")]
    Empty,
}

/// Opaque identifier assigned by the remote store at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecommendationId(String);

impl RecommendationId {
    /// Wrap a store-issued identifier.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::RecommendationId;
    ///
    /// let id = RecommendationId::new("42").expect("valid id");
    /// assert_eq!(id.as_str(), "42");
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, RecommendationIdError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(RecommendationIdError::Empty);
        }
        Ok(Self(raw))
    }

    /// Fresh identifier, used by stores that mint their own ids.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RecommendationId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<RecommendationId> for String {
    fn from(value: RecommendationId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RecommendationId {
    type Error = RecommendationIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A recommendation as stored remotely and held in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Store-assigned identity, unique within a user's set.
    pub id: RecommendationId,
    /// What was recommended.
    pub title: String,
    /// Free-form category label; not a closed vocabulary.
    pub category: String,
    /// Who recommended it.
    pub friend_name: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional link.
    pub url: Option<Url>,
    /// Calendar date the recommendation was recorded.
    pub date: NaiveDate,
    /// Whether the user has acted on the recommendation.
    pub used: bool,
    /// Owning user.
    pub user_id: UserId,
}

impl Recommendation {
    /// Materialise a stored record from a creation request and its new id.
    ///
    /// Stores call this once they have minted an id; `used` always starts
    /// out `false`.
    pub fn from_new(id: RecommendationId, new: NewRecommendation) -> Self {
        let NewRecommendation {
            title,
            category,
            friend_name,
            notes,
            url,
            date,
            user_id,
        } = new;
        Self {
            id,
            title,
            category,
            friend_name,
            notes,
            url,
            date,
            used: false,
            user_id,
        }
    }
}

/// Creation request: a recommendation without `id` and `used`.
///
/// Callers are expected to supply non-empty `title`, `category`, and
/// `friend_name`; the remote store may reject anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecommendation {
    /// What was recommended.
    pub title: String,
    /// Resolved category label.
    pub category: String,
    /// Who recommended it.
    pub friend_name: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional link.
    pub url: Option<Url>,
    /// Calendar date to record.
    pub date: NaiveDate,
    /// Owning user.
    pub user_id: UserId,
}

impl NewRecommendation {
    /// Whether the required text fields are all present.
    pub fn has_required_fields(&self) -> bool {
        [&self.title, &self.category, &self.friend_name]
            .into_iter()
            .all(|value| !value.trim().is_empty())
    }
}
