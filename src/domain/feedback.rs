use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Dates on which a child has a session feedback entry.
///
/// Membership is by calendar day, so entries sent as timestamps collapse to
/// their date.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FeedbackDates(BTreeSet<NaiveDate>);

impl FeedbackDates {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self(dates.into_iter().collect())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }
}

/// Parses `YYYY-MM-DD`, also accepting a trailing time component.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl<'de> Deserialize<'de> for FeedbackDates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default)]
            dates: Option<Vec<String>>,
        }

        let payload = Payload::deserialize(deserializer)?;
        let dates = payload
            .dates
            .unwrap_or_default()
            .iter()
            .filter_map(|raw| {
                let parsed = parse_calendar_day(raw);
                if parsed.is_none() {
                    log::warn!("Skipping malformed feedback date {raw:?}");
                }
                parsed
            })
            .collect();
        Ok(Self(dates))
    }
}

/// Feedback recorded for one session day.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDetail {
    #[serde(default)]
    pub storybook_title: Option<String>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub evaluation: Option<String>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub improvements: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
}
