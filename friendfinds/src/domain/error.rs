//! Domain-level error taxonomy.
//!
//! Every remote failure is caught at the cache or pipeline boundary and
//! converted into one of these variants; nothing escapes as a panic. Filter
//! evaluation is total and has no error type.

use thiserror::Error;

use super::ports::RecommendationStoreError;

/// Typed failure returned by cache loads and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationError {
    /// Loading the recommendation set failed; the previous snapshot is kept.
    #[error("failed to load recommendations: {message}")]
    Fetch {
        /// Adapter-supplied detail.
        message: String,
    },
    /// The store rejected a malformed record.
    #[error("invalid recommendation: {message}")]
    Validation {
        /// Adapter-supplied detail.
        message: String,
    },
    /// The targeted recommendation does not exist remotely.
    #[error("recommendation {id} not found")]
    NotFound {
        /// Identifier the caller targeted.
        id: String,
    },
    /// Insert, update, or delete failed.
    #[error("failed to write recommendation: {message}")]
    Write {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl RecommendationError {
    /// Human-readable text suitable for showing to the user.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::RecommendationError;
    ///
    /// let err = RecommendationError::Fetch { message: "timeout".to_owned() };
    /// assert_eq!(err.user_message(), "Failed to load recommendations. Please try again.");
    /// ```
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "Failed to load recommendations. Please try again.",
            Self::Validation { .. } => "Please fill in all required fields",
            Self::NotFound { .. } => "This recommendation no longer exists.",
            Self::Write { .. } => "Failed to save changes. Please try again.",
        }
    }
}

impl From<RecommendationStoreError> for RecommendationError {
    fn from(value: RecommendationStoreError) -> Self {
        match value {
            RecommendationStoreError::Fetch { message } => Self::Fetch { message },
            RecommendationStoreError::Validation { message } => Self::Validation { message },
            RecommendationStoreError::NotFound { id } => Self::NotFound { id },
            RecommendationStoreError::Write { message } => Self::Write { message },
        }
    }
}
