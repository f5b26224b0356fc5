//! Feedback calendar panel for one child.

use chrono::NaiveDate;

use crate::domain::client::{ClientDetail, ClientSummary};
use crate::domain::feedback::{FeedbackDates, FeedbackDetail};
use crate::domain::types::ClientId;
use crate::dto::feedback::{CalendarPane, CalendarView, TileDecoration};
use crate::repository::{FeedbackReader, ScheduleReader};
use crate::services::ServiceResult;

/// State behind the calendar panel.
///
/// Every operation takes `&mut self` for the whole request, so a panel that
/// was closed or reopened can never receive an older response.
#[derive(Debug, Default)]
pub struct FeedbackCalendar {
    client: Option<ClientSummary>,
    client_detail: Option<ClientDetail>,
    selected_date: Option<NaiveDate>,
    dates: FeedbackDates,
    content: Option<FeedbackDetail>,
    pane: CalendarPane,
}

impl FeedbackCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the panel for `client`, selecting `today`.
    pub async fn open<R>(&mut self, repo: &R, client: &ClientSummary, today: NaiveDate) -> ServiceResult<()>
    where
        R: ScheduleReader + FeedbackReader + ?Sized,
    {
        self.close();
        self.client = Some(client.clone());
        self.selected_date = Some(today);

        let client_id = client.client_id;
        let detail = repo.get_client_detail(client_id).await.map_err(|err| {
            log::error!("Failed to load detail for client {client_id}: {err}");
            err
        })?;
        self.client_detail = Some(detail);

        let dates = repo.list_feedback_dates(client_id).await.map_err(|err| {
            log::error!("Failed to load feedback dates for client {client_id}: {err}");
            err
        })?;
        log::debug!("Client {client_id} has {} feedback day(s)", dates.len());
        self.dates = dates;

        Ok(())
    }

    /// Selects `date`; returns whether feedback was loaded for it.
    pub async fn select_date<R>(&mut self, repo: &R, date: NaiveDate) -> ServiceResult<bool>
    where
        R: FeedbackReader + ?Sized,
    {
        self.selected_date = Some(date);
        self.content = None;

        let Some(client_id) = self.client_id() else {
            return Ok(false);
        };
        if !self.dates.contains(date) {
            self.pane = CalendarPane::Calendar;
            return Ok(false);
        }

        let detail = repo
            .get_feedback_detail(client_id, date)
            .await
            .map_err(|err| {
                log::error!("Failed to load feedback of client {client_id} for {date}: {err}");
                err
            })?;
        self.content = Some(detail);
        self.pane = CalendarPane::Detail;
        Ok(true)
    }

    pub fn back(&mut self) {
        self.pane = CalendarPane::Calendar;
        self.content = None;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn tile(&self, date: NaiveDate, view: CalendarView) -> TileDecoration {
        TileDecoration::for_date(date, &self.dates, view)
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&ClientSummary> {
        self.client.as_ref()
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.client.as_ref().map(|client| client.client_id)
    }

    pub fn client_detail(&self) -> Option<&ClientDetail> {
        self.client_detail.as_ref()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn dates(&self) -> &FeedbackDates {
        &self.dates
    }

    pub fn content(&self) -> Option<&FeedbackDetail> {
        self.content.as_ref()
    }

    pub fn pane(&self) -> CalendarPane {
        self.pane
    }
}
