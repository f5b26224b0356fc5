//! In-memory backend shared by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use malmoon_client::domain::chat::{ChatMessage, ChatRoom, MessageType, NewChatMessage, NewChatRoom};
use malmoon_client::domain::client::{ClientDetail, ClientSummary};
use malmoon_client::domain::feedback::{FeedbackDates, FeedbackDetail};
use malmoon_client::domain::member::{
    AuthenticatedUser, MemberPatch, MemberProfile, PasswordChange, UserType,
};
use malmoon_client::domain::types::{ClientId, MemberId, RoomId};
use malmoon_client::repository::errors::{RepositoryError, RepositoryResult};
use malmoon_client::repository::{
    ChatReader, ChatWriter, FeedbackReader, MemberReader, MemberWriter, ScheduleReader,
};

pub fn therapist() -> AuthenticatedUser {
    AuthenticatedUser {
        access_token: "token".to_string(),
        member_id: MemberId::new(10).unwrap(),
        name: "Dr. Kim".to_string(),
        user_type: UserType::Therapist,
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
struct State {
    clients: Vec<Value>,
    details: HashMap<i64, Value>,
    failing_details: HashSet<i64>,
    pending: usize,
    feedback: HashMap<i64, BTreeMap<NaiveDate, FeedbackDetail>>,
    rooms: HashMap<Vec<i64>, i64>,
    messages: HashMap<i64, Vec<ChatMessage>>,
    me: Value,
    password: String,
    patches: Vec<MemberPatch>,
}

/// Backend double keeping everything in memory.
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                me: json!({ "name": "Dr. Kim", "careerYears": 3, "careers": [] }),
                password: "secret1".to_string(),
                ..State::default()
            }),
        }
    }

    /// Adds a client with raw summary and detail payloads.
    pub fn with_client(self, summary: Value, detail: Value) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = summary["clientId"].as_i64().unwrap();
            state.clients.push(summary);
            state.details.insert(id, detail);
        }
        self
    }

    pub fn failing_detail(self, client_id: i64) -> Self {
        self.state.lock().unwrap().failing_details.insert(client_id);
        self
    }

    pub fn with_pending(self, pending: usize) -> Self {
        self.state.lock().unwrap().pending = pending;
        self
    }

    pub fn with_feedback(self, client_id: i64, date: NaiveDate, detail: FeedbackDetail) -> Self {
        self.state
            .lock()
            .unwrap()
            .feedback
            .entry(client_id)
            .or_default()
            .insert(date, detail);
        self
    }

    pub fn with_me(self, me: Value) -> Self {
        self.state.lock().unwrap().me = me;
        self
    }

    pub fn patches(&self) -> Vec<MemberPatch> {
        self.state.lock().unwrap().patches.clone()
    }

    pub fn room_count(&self) -> usize {
        self.state.lock().unwrap().rooms.len()
    }

    pub fn password(&self) -> String {
        self.state.lock().unwrap().password.clone()
    }
}

#[async_trait]
impl ScheduleReader for FakeBackend {
    async fn count_pending_requests(&self) -> RepositoryResult<usize> {
        Ok(self.state.lock().unwrap().pending)
    }

    async fn list_therapist_clients(&self) -> RepositoryResult<Vec<ClientSummary>> {
        let clients = self.state.lock().unwrap().clients.clone();
        Ok(serde_json::from_value(Value::Array(clients))?)
    }

    async fn get_client_detail(&self, client_id: ClientId) -> RepositoryResult<ClientDetail> {
        let state = self.state.lock().unwrap();
        if state.failing_details.contains(&client_id.get()) {
            return Err(RepositoryError::Http {
                status: 500,
                body: "detail unavailable".to_string(),
            });
        }
        let detail = state
            .details
            .get(&client_id.get())
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        Ok(serde_json::from_value(detail)?)
    }
}

#[async_trait]
impl FeedbackReader for FakeBackend {
    async fn list_feedback_dates(&self, child_id: ClientId) -> RepositoryResult<FeedbackDates> {
        let state = self.state.lock().unwrap();
        let dates = state
            .feedback
            .get(&child_id.get())
            .map(|entries| entries.keys().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(FeedbackDates::new(dates))
    }

    async fn get_feedback_detail(
        &self,
        child_id: ClientId,
        date: NaiveDate,
    ) -> RepositoryResult<FeedbackDetail> {
        self.state
            .lock()
            .unwrap()
            .feedback
            .get(&child_id.get())
            .and_then(|entries| entries.get(&date))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ChatReader for FakeBackend {
    async fn list_chat_messages(&self, room_id: RoomId) -> RepositoryResult<Vec<ChatMessage>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .messages
            .get(&room_id.get())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ChatWriter for FakeBackend {
    async fn create_or_get_room(&self, room: &NewChatRoom) -> RepositoryResult<ChatRoom> {
        let mut state = self.state.lock().unwrap();
        let mut key = room.participant_ids.clone();
        key.sort_unstable();
        let next_id = state.rooms.len() as i64 + 1;
        let room_id = *state.rooms.entry(key).or_insert(next_id);
        Ok(ChatRoom {
            room_id: RoomId::new(room_id)?,
        })
    }

    async fn send_chat_message(&self, message: &NewChatMessage) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        let messages = state.messages.entry(message.room_id.get()).or_default();
        let message_id = messages.len() as i64 + 1;
        messages.push(ChatMessage {
            message_id: Some(message_id),
            sender_id: message.sender_id.get(),
            content: message.content.clone(),
            message_type: Some(MessageType::Talk),
            send_at: Some(message.send_at.to_rfc3339()),
        });
        Ok(())
    }
}

#[async_trait]
impl MemberReader for FakeBackend {
    async fn get_me(&self) -> RepositoryResult<MemberProfile> {
        let me = self.state.lock().unwrap().me.clone();
        Ok(serde_json::from_value(me)?)
    }
}

#[async_trait]
impl MemberWriter for FakeBackend {
    async fn update_me(&self, patch: &MemberPatch) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        let update = serde_json::to_value(patch)?;
        if let (Some(me), Value::Object(fields)) = (state.me.as_object_mut(), update) {
            me.extend(fields);
        }
        state.patches.push(patch.clone());
        Ok(())
    }

    async fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.password != change.current_password {
            return Err(RepositoryError::BadRequest(
                "current password mismatch".to_string(),
            ));
        }
        state.password = change.new_password.clone();
        Ok(())
    }
}
