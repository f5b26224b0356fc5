use malmoon_client::domain::feedback::FeedbackDetail;
use malmoon_client::dto::feedback::{CalendarPane, CalendarView, HAS_FEEDBACK_CLASS};
use malmoon_client::repository::ScheduleReader;
use malmoon_client::services::feedback::FeedbackCalendar;
use serde_json::json;

mod common;

use common::day;

fn backend() -> common::FakeBackend {
    common::FakeBackend::new()
        .with_client(
            json!({ "clientId": 4, "name": "Mina" }),
            json!({ "name": "Mina", "birthDate": "2019-05-01" }),
        )
        .with_feedback(
            4,
            day(2025, 3, 4),
            FeedbackDetail {
                storybook_title: Some("Three Little Ducks".to_string()),
                accuracy: Some(91.0),
                strengths: Some("clear /s/ sounds".to_string()),
                ..FeedbackDetail::default()
            },
        )
}

#[tokio::test]
async fn browsing_the_calendar() {
    let repo = backend();
    let client = repo.list_therapist_clients().await.unwrap().remove(0);
    let mut calendar = FeedbackCalendar::new();

    calendar.open(&repo, &client, day(2025, 3, 20)).await.unwrap();
    assert_eq!(
        calendar.client_detail().and_then(|d| d.birth_date.as_deref()),
        Some("2019-05-01")
    );

    let days: Vec<_> = calendar.dates().iter().copied().collect();
    assert_eq!(days, vec![day(2025, 3, 4)]);

    let tile = calendar.tile(day(2025, 3, 4), CalendarView::Month);
    assert_eq!(tile.class_name, Some(HAS_FEEDBACK_CLASS));
    assert!(!calendar.tile(day(2025, 3, 4), CalendarView::Decade).marker);

    assert!(!calendar.select_date(&repo, day(2025, 3, 5)).await.unwrap());
    assert_eq!(calendar.pane(), CalendarPane::Calendar);

    assert!(calendar.select_date(&repo, day(2025, 3, 4)).await.unwrap());
    assert_eq!(calendar.pane(), CalendarPane::Detail);
    assert_eq!(
        calendar.content().and_then(|c| c.storybook_title.as_deref()),
        Some("Three Little Ducks")
    );

    calendar.back();
    assert_eq!(calendar.pane(), CalendarPane::Calendar);
    assert_eq!(calendar.selected_date(), Some(day(2025, 3, 4)));
}

#[tokio::test]
async fn reopening_for_another_child_resets_everything() {
    let repo = backend().with_client(
        json!({ "clientId": 5, "name": "Joon" }),
        json!({ "name": "Joon" }),
    );
    let clients = repo.list_therapist_clients().await.unwrap();
    let mut calendar = FeedbackCalendar::new();

    calendar.open(&repo, &clients[0], day(2025, 3, 20)).await.unwrap();
    calendar.select_date(&repo, day(2025, 3, 4)).await.unwrap();

    calendar.open(&repo, &clients[1], day(2025, 4, 1)).await.unwrap();

    assert_eq!(calendar.client_id().map(|id| id.get()), Some(5));
    assert_eq!(calendar.selected_date(), Some(day(2025, 4, 1)));
    assert_eq!(calendar.pane(), CalendarPane::Calendar);
    assert!(calendar.content().is_none());
    assert!(calendar.dates().is_empty());
}
