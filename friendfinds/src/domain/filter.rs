//! Filter engine over cached recommendations.
//!
//! Evaluation is pure: a [`FilterSpec`] value is passed in on every call and
//! the engine keeps no state between calls. Every active clause must match
//! (logical AND) and output order always equals input order.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Recommendation;

/// Selector value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

/// Categories offered by the add form before any records exist.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Plumbers",
    "Electricians",
    "Restaurants",
    "Doctors",
    "Mechanics",
    "Others",
];

/// Category clause: everything, or one exact, case-sensitive label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    /// Match every record.
    #[default]
    All,
    /// Match records whose category equals this label exactly.
    Exact(String),
}

impl CategoryFilter {
    /// Interpret a selector value, where `"all"` lifts the restriction.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::CategoryFilter;
    ///
    /// assert_eq!(CategoryFilter::from_selection("all"), CategoryFilter::All);
    /// assert_eq!(
    ///     CategoryFilter::from_selection("Restaurants"),
    ///     CategoryFilter::Exact("Restaurants".to_owned())
    /// );
    /// ```
    pub fn from_selection(value: impl Into<String>) -> Self {
        let value = value.into();
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Exact(value)
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => expected == category,
        }
    }
}

/// Error returned when parsing an unknown status selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status filter `{0}`; expected all, used, or unused")]
pub struct StatusFilterParseError(String);

/// Used/unused clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Match both states.
    #[default]
    All,
    /// Match records marked used.
    Used,
    /// Match records not yet used.
    Unused,
}

impl StatusFilter {
    fn matches(self, used: bool) -> bool {
        match self {
            Self::All => true,
            Self::Used => used,
            Self::Unused => !used,
        }
    }

    /// Selector value for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Used => "used",
            Self::Unused => "unused",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = StatusFilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "used" => Ok(Self::Used),
            "unused" => Ok(Self::Unused),
            other => Err(StatusFilterParseError(other.to_owned())),
        }
    }
}

/// Inclusive date window; either bound may be open.
///
/// A window whose start is after its end matches nothing. The bounds are
/// never swapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest date to include.
    pub start: Option<NaiveDate>,
    /// Latest date to include.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Window between two optional bounds.
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Whether `date` lies inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Complete filter specification, one field per clause.
///
/// `Default` yields a specification that matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring searched in title, category, friend, notes.
    pub search_term: String,
    /// Category clause.
    pub category: CategoryFilter,
    /// Used/unused clause.
    pub status: StatusFilter,
    /// Exact friend name, when focused on one friend.
    pub friend: Option<String>,
    /// Inclusive date window.
    pub date_range: DateRange,
}

impl FilterSpec {
    /// Replace the search term.
    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Replace the category clause.
    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Replace the status clause.
    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Replace the friend clause.
    #[must_use]
    pub fn with_friend(mut self, friend: Option<String>) -> Self {
        self.friend = friend;
        self
    }

    /// Replace the date window.
    #[must_use]
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Whether `record` satisfies every clause.
    pub fn matches(&self, record: &Recommendation) -> bool {
        self.matches_search(record)
            && self.category.matches(&record.category)
            && self.status.matches(record.used)
            && self
                .friend
                .as_deref()
                .is_none_or(|friend| friend == record.friend_name)
            && self.date_range.contains(record.date)
    }

    fn matches_search(&self, record: &Recommendation) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&record.title)
            || contains(&record.category)
            || contains(&record.friend_name)
            || record.notes.as_deref().is_some_and(contains)
    }
}

/// Records that satisfy `spec`, in their original order.
pub fn apply<'a>(records: &'a [Recommendation], spec: &FilterSpec) -> Vec<&'a Recommendation> {
    records.iter().filter(|record| spec.matches(record)).collect()
}

/// Distinct categories present in `records`, first occurrence first.
pub fn categories(records: &[Recommendation]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for record in records {
        if seen.insert(record.category.as_str()) {
            distinct.push(record.category.clone());
        }
    }
    distinct
}

/// Distinct, non-empty friend names, sorted for presentation.
pub fn friends(records: &[Recommendation]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.friend_name.as_str())
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Categories offered when adding: defaults, then any others in the cache.
pub fn category_options(records: &[Recommendation]) -> Vec<String> {
    let mut options: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect();
    for category in categories(records) {
        if !options.contains(&category) {
            options.push(category);
        }
    }
    options
}

/// Why a visible list came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The user has not recorded anything yet.
    NoRecommendations,
    /// Records exist but the filter excludes all of them.
    NoMatches,
}

impl EmptyState {
    /// Placeholder text shown instead of the list.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoRecommendations => "No recommendations yet. Add your first one!",
            Self::NoMatches => "No recommendations match your search.",
        }
    }
}

/// Filtered view of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRecommendations<'a> {
    /// Matching records in snapshot order.
    pub items: Vec<&'a Recommendation>,
    /// Set when `items` is empty.
    pub empty_state: Option<EmptyState>,
}

/// Apply `spec` and classify an empty result.
pub fn visible<'a>(records: &'a [Recommendation], spec: &FilterSpec) -> VisibleRecommendations<'a> {
    let items = apply(records, spec);
    let empty_state = match (records.is_empty(), items.is_empty()) {
        (true, _) => Some(EmptyState::NoRecommendations),
        (false, true) => Some(EmptyState::NoMatches),
        (false, false) => None,
    };
    VisibleRecommendations { items, empty_state }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
