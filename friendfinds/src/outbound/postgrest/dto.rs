//! Row DTOs for the hosted recommendation table.
//!
//! Rows are decoded into these transport shapes first and then mapped into
//! domain records in one pass, so a malformed column surfaces as a single
//! decode message naming the row.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{NewRecommendation, Recommendation, RecommendationId, UserId};

/// Row identifiers arrive as UUID strings or bigint keys depending on the
/// table definition.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RowIdDto {
    Text(String),
    Number(i64),
}

impl RowIdDto {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RecommendationRowDto {
    pub(super) id: RowIdDto,
    pub(super) title: String,
    pub(super) category: String,
    pub(super) friend_name: String,
    #[serde(default)]
    pub(super) notes: Option<String>,
    #[serde(default)]
    pub(super) url: Option<String>,
    pub(super) date: String,
    #[serde(default)]
    pub(super) used: bool,
    pub(super) user_id: String,
}

impl RecommendationRowDto {
    pub(super) fn into_domain(self) -> Result<Recommendation, String> {
        let id = RecommendationId::new(self.id.into_string())
            .map_err(|err| format!("row has invalid id: {err}"))?;
        let user_id = UserId::new(&self.user_id)
            .map_err(|err| format!("row {id} has invalid user_id: {err}"))?;
        let date = parse_row_date(&self.date)
            .ok_or_else(|| format!("row {id} has invalid date `{}`", self.date))?;
        let url = match non_blank(self.url) {
            Some(raw) => Some(
                Url::parse(&raw).map_err(|err| format!("row {id} has invalid url `{raw}`: {err}"))?,
            ),
            None => None,
        };

        Ok(Recommendation {
            id,
            title: self.title,
            category: self.category,
            friend_name: self.friend_name,
            notes: non_blank(self.notes),
            url,
            date,
            used: self.used,
            user_id,
        })
    }
}

/// Insert payload. `id` is omitted so the table assigns it.
#[derive(Debug, Serialize)]
pub(super) struct NewRecommendationRowDto<'a> {
    pub(super) title: &'a str,
    pub(super) category: &'a str,
    pub(super) friend_name: &'a str,
    pub(super) notes: Option<&'a str>,
    pub(super) url: Option<&'a str>,
    pub(super) date: String,
    pub(super) used: bool,
    pub(super) user_id: &'a str,
}

impl<'a> From<&'a NewRecommendation> for NewRecommendationRowDto<'a> {
    fn from(record: &'a NewRecommendation) -> Self {
        Self {
            title: &record.title,
            category: &record.category,
            friend_name: &record.friend_name,
            notes: record.notes.as_deref(),
            url: record.url.as_ref().map(Url::as_str),
            date: record.date.format("%Y-%m-%d").to_string(),
            used: false,
            user_id: record.user_id.as_ref(),
        }
    }
}

/// Accept plain dates and full timestamps; the table has stored both.
fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
