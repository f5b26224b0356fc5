//! DTOs for the feedback calendar panel.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::feedback::FeedbackDates;

/// CSS class applied to tiles that have feedback.
pub const HAS_FEEDBACK_CLASS: &str = "has-feedback";

/// Which half of the feedback panel is visible.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarPane {
    #[default]
    Calendar,
    Detail,
}

/// Granularity the calendar widget is currently showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarView {
    #[default]
    Month,
    Year,
    Decade,
    Century,
}

/// Decoration of a single calendar tile.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TileDecoration {
    pub marker: bool,
    pub class_name: Option<&'static str>,
}

impl TileDecoration {
    /// Decorates day tiles whose calendar day is in `dates`.
    pub fn for_date(date: NaiveDate, dates: &FeedbackDates, view: CalendarView) -> Self {
        if view == CalendarView::Month && dates.contains(date) {
            Self {
                marker: true,
                class_name: Some(HAS_FEEDBACK_CLASS),
            }
        } else {
            Self::default()
        }
    }
}
