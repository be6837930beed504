//! Add-form draft and its validation.
//!
//! The mutation pipeline does not validate input. Forms build a
//! [`RecommendationDraft`] from raw text fields and convert it into a
//! [`NewRecommendation`] here, which trims values, resolves the custom
//! category, and stamps today's date.

use mockable::Clock;
use thiserror::Error;
use url::Url;

use super::{NewRecommendation, UserId};

/// Category choice that defers to the free-text custom category.
pub const CUSTOM_CATEGORY_CHOICE: &str = "Others";

/// Reasons a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Title, category, or friend name is blank.
    #[error("Please fill in all required fields")]
    MissingFields,
    /// The link does not parse as a URL.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl {
        /// Raw input.
        url: String,
        /// Parser message.
        reason: String,
    },
}

/// Raw form fields for a new recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationDraft {
    /// Title text.
    pub title: String,
    /// Selected category; [`CUSTOM_CATEGORY_CHOICE`] defers to
    /// `custom_category`.
    pub category: String,
    /// Free-text category used with the custom choice.
    pub custom_category: String,
    /// Recommending friend.
    pub friend_name: String,
    /// Notes text.
    pub notes: String,
    /// Link text.
    pub url: String,
}

impl RecommendationDraft {
    /// Category that will be stored, after resolving the custom choice.
    pub fn resolved_category(&self) -> &str {
        if self.category == CUSTOM_CATEGORY_CHOICE {
            self.custom_category.trim()
        } else {
            self.category.trim()
        }
    }

    /// Validate the draft and build a creation request dated today.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::{RecommendationDraft, UserId};
    /// use mockable::DefaultClock;
    ///
    /// let draft = RecommendationDraft {
    ///     title: "Tako Sushi".to_owned(),
    ///     category: "Others".to_owned(),
    ///     custom_category: "Sushi bars".to_owned(),
    ///     friend_name: "Ana".to_owned(),
    ///     ..RecommendationDraft::default()
    /// };
    /// let new = draft.into_new_recommendation(UserId::random(), &DefaultClock).expect("valid draft");
    /// assert_eq!(new.category, "Sushi bars");
    /// assert!(new.notes.is_none());
    /// ```
    pub fn into_new_recommendation(
        self,
        user_id: UserId,
        clock: &dyn Clock,
    ) -> Result<NewRecommendation, DraftError> {
        let category = self.resolved_category().to_owned();
        let title = self.title.trim();
        let friend_name = self.friend_name.trim();
        if title.is_empty() || category.is_empty() || friend_name.is_empty() {
            return Err(DraftError::MissingFields);
        }

        let url = non_blank(&self.url)
            .map(|raw| {
                Url::parse(raw).map_err(|err| DraftError::InvalidUrl {
                    url: raw.to_owned(),
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        Ok(NewRecommendation {
            title: title.to_owned(),
            category,
            friend_name: friend_name.to_owned(),
            notes: non_blank(&self.notes).map(str::to_owned),
            url,
            date: clock.utc().date_naive(),
            user_id,
        })
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
