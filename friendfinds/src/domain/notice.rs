//! User-visible notices raised by the mutation pipeline.

use serde::Serialize;

use super::RecommendationError;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Success,
    /// The action failed and nothing changed.
    Error,
}

/// The three mutations the pipeline performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Create a recommendation.
    Add,
    /// Remove a recommendation.
    Delete,
    /// Set the `used` flag.
    ToggleUsed,
}

impl MutationKind {
    /// Stable label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::ToggleUsed => "toggle_used",
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::ToggleUsed => "update",
        }
    }
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub description: String,
}

impl Notice {
    /// Confirmation shown once a mutation is reflected in the cache.
    ///
    /// Returns `None` for mutations that complete silently.
    pub fn success(kind: MutationKind) -> Option<Self> {
        let (title, description) = match kind {
            MutationKind::Add => ("Success!", "Recommendation added successfully"),
            MutationKind::Delete => ("Success", "Recommendation deleted successfully"),
            MutationKind::ToggleUsed => return None,
        };
        Some(Self {
            level: NoticeLevel::Success,
            title: title.to_owned(),
            description: description.to_owned(),
        })
    }

    /// Error shown when a mutation fails.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::{MutationKind, Notice, NoticeLevel};
    ///
    /// let notice = Notice::failure(MutationKind::ToggleUsed);
    /// assert_eq!(notice.level, NoticeLevel::Error);
    /// assert_eq!(notice.description, "Failed to update recommendation. Please try again.");
    /// ```
    pub fn failure(kind: MutationKind) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_owned(),
            description: format!(
                "Failed to {} recommendation. Please try again.",
                kind.verb()
            ),
        }
    }

    /// Error shown for a typed failure outside the mutation itself, such as
    /// a reload that failed after a successful write.
    pub fn from_error(error: &RecommendationError) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_owned(),
            description: error.user_message().to_owned(),
        }
    }
}
