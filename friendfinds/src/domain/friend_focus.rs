//! Friend focus: single-friend selection layered on the filter.
//!
//! Clicking a friend's name narrows the list to that friend; clicking the
//! same name again lifts the restriction. A new friend always replaces the
//! previous one.

use super::{CategoryFilter, FilterSpec};

impl FilterSpec {
    /// Toggle focus on `name`.
    ///
    /// Focusing (or unfocusing) by click also resets the category clause to
    /// all categories.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::domain::FilterSpec;
    ///
    /// let mut spec = FilterSpec::default();
    /// spec.focus_friend("Ana");
    /// assert_eq!(spec.friend.as_deref(), Some("Ana"));
    /// spec.focus_friend("Ana");
    /// assert_eq!(spec.friend, None);
    /// ```
    pub fn focus_friend(&mut self, name: &str) {
        if self.friend.as_deref() == Some(name) {
            self.friend = None;
        } else {
            self.friend = Some(name.to_owned());
        }
        self.category = CategoryFilter::All;
    }

    /// Set the friend clause from a selector, replacing any prior choice.
    ///
    /// `None` (the "all friends" entry) clears it. Other clauses are left
    /// untouched.
    pub fn select_friend(&mut self, selection: Option<&str>) {
        self.friend = selection.map(str::to_owned);
    }

    /// Explicit clear action.
    pub fn clear_friend_focus(&mut self) {
        self.friend = None;
    }

    /// Friend currently in focus.
    pub fn focused_friend(&self) -> Option<&str> {
        self.friend.as_deref()
    }
}
