use std::sync::Arc;
use std::time::Duration;

use malmoon_client::domain::chat::NewChatMessage;
use malmoon_client::domain::types::MemberId;
use malmoon_client::dto::chat::MessageDirection;
use malmoon_client::repository::{ChatWriter, ScheduleReader};
use malmoon_client::services::chat::{ChatPanel, ChatPanelState};
use serde_json::json;

mod common;

const PERIOD: Duration = Duration::from_secs(3);

fn backend() -> Arc<common::FakeBackend> {
    Arc::new(common::FakeBackend::new().with_client(
        json!({ "clientId": 3, "name": "Mina" }),
        json!({ "name": "Mina" }),
    ))
}

#[tokio::test(start_paused = true)]
async fn conversation_round_trip() {
    let repo = backend();
    let client = repo.list_therapist_clients().await.unwrap().remove(0);
    let mut panel = ChatPanel::new(Arc::clone(&repo), common::therapist(), PERIOD);

    let room_id = panel.open(&client).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(matches!(panel.state(), ChatPanelState::Ready { .. }));

    assert!(panel.send("Great practice today!").await.unwrap());
    assert_eq!(panel.transcript().len(), 1);

    // The child answers from another device; the next tick picks it up.
    let reply = NewChatMessage::talk(room_id, MemberId::new(3).unwrap(), "thank you".to_string());
    repo.send_chat_message(&reply).await.unwrap();
    tokio::time::sleep(PERIOD).await;

    let lines = panel.transcript();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].direction, MessageDirection::Sent);
    assert_eq!(lines[1].direction, MessageDirection::Received);
    assert_eq!(lines[1].content, "thank you");

    panel.close();
}

#[tokio::test(start_paused = true)]
async fn reopening_the_same_client_reuses_the_room() {
    let repo = backend();
    let client = repo.list_therapist_clients().await.unwrap().remove(0);
    let mut panel = ChatPanel::new(Arc::clone(&repo), common::therapist(), PERIOD);

    let first = panel.open(&client).await.unwrap();
    panel.close();
    let second = panel.open(&client).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(repo.room_count(), 1);
    panel.close();
}

#[tokio::test(start_paused = true)]
async fn closed_panel_ignores_updates() {
    let repo = backend();
    let client = repo.list_therapist_clients().await.unwrap().remove(0);
    let mut panel = ChatPanel::new(Arc::clone(&repo), common::therapist(), PERIOD);

    let room_id = panel.open(&client).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    panel.close();

    let late = NewChatMessage::talk(room_id, MemberId::new(3).unwrap(), "hello?".to_string());
    repo.send_chat_message(&late).await.unwrap();
    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(panel.state(), ChatPanelState::Closed);
    assert!(panel.transcript().is_empty());
    assert!(!panel.send("anyone there").await.unwrap());
}
