//! Test utilities for the friendfinds crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Only compiled for tests or with the `test-support` feature.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use url::Url;

use crate::domain::{NewRecommendation, Recommendation, RecommendationId, UserId};

/// Fixed user used by fixtures unless overridden.
pub const FIXTURE_USER_ID: &str = "11111111-1111-1111-1111-111111111111";

/// Parse a `YYYY-MM-DD` fixture date.
///
/// # Panics
///
/// Panics when `raw` is not a valid date; fixtures are static.
#[expect(clippy::expect_used, reason = "fixture dates are static literals")]
pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date must be YYYY-MM-DD")
}

/// The fixture user id.
///
/// # Panics
///
/// Never in practice; the constant is a valid UUID.
#[expect(clippy::expect_used, reason = "fixture id is a static literal")]
pub fn fixture_user() -> UserId {
    UserId::new(FIXTURE_USER_ID).expect("fixture user id is a UUID")
}

/// Builder for [`Recommendation`] fixtures.
///
/// # Examples
/// ```
/// use friendfinds::test_support::RecommendationFixture;
///
/// let record = RecommendationFixture::new("1", "Tako Sushi")
///     .category("Restaurants")
///     .friend("Ana")
///     .on("2024-01-05")
///     .build();
/// assert_eq!(record.friend_name, "Ana");
/// assert!(!record.used);
/// ```
#[derive(Debug, Clone)]
pub struct RecommendationFixture {
    record: Recommendation,
}

impl RecommendationFixture {
    /// Start a fixture with the given id and title.
    ///
    /// # Panics
    ///
    /// Panics when `id` is blank.
    #[expect(clippy::expect_used, reason = "fixture ids are static literals")]
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            record: Recommendation {
                id: RecommendationId::new(id).expect("fixture id must not be blank"),
                title: title.to_owned(),
                category: "Others".to_owned(),
                friend_name: "Sam".to_owned(),
                notes: None,
                url: None,
                date: date("2024-01-01"),
                used: false,
                user_id: fixture_user(),
            },
        }
    }

    /// Set the category.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.record.category);
        self
    }

    /// Set the recommending friend.
    #[must_use]
    pub fn friend(mut self, friend: &str) -> Self {
        friend.clone_into(&mut self.record.friend_name);
        self
    }

    /// Set notes.
    #[must_use]
    pub fn notes(mut self, notes: &str) -> Self {
        self.record.notes = Some(notes.to_owned());
        self
    }

    /// Set the link.
    ///
    /// # Panics
    ///
    /// Panics when `url` does not parse.
    #[must_use]
    #[expect(clippy::expect_used, reason = "fixture urls are static literals")]
    pub fn url(mut self, url: &str) -> Self {
        self.record.url = Some(Url::parse(url).expect("fixture url must parse"));
        self
    }

    /// Set the date from `YYYY-MM-DD`.
    #[must_use]
    pub fn on(mut self, raw: &str) -> Self {
        self.record.date = date(raw);
        self
    }

    /// Set the used flag.
    #[must_use]
    pub fn used(mut self, used: bool) -> Self {
        self.record.used = used;
        self
    }

    /// Set the owner.
    #[must_use]
    pub fn owned_by(mut self, user_id: UserId) -> Self {
        self.record.user_id = user_id;
        self
    }

    /// Finish the record.
    pub fn build(self) -> Recommendation {
        self.record
    }

    /// Creation request carrying the same fields, minus id and flag.
    pub fn build_new(self) -> NewRecommendation {
        let Recommendation {
            title,
            category,
            friend_name,
            notes,
            url,
            date,
            user_id,
            ..
        } = self.record;
        NewRecommendation {
            title,
            category,
            friend_name,
            notes,
            url,
            date,
            user_id,
        }
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at midday UTC on `raw` (`YYYY-MM-DD`).
    ///
    /// # Panics
    ///
    /// Panics when `raw` is not a valid date.
    #[expect(clippy::expect_used, reason = "fixture dates are static literals")]
    pub fn on(raw: &str) -> Arc<dyn Clock> {
        let day = date(raw);
        let utc_now = Utc
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).expect("midday exists"))
            .single()
            .expect("UTC has no ambiguous instants");
        Arc::new(Self { utc_now })
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}
