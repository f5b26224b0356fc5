use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{MemberId, RoomId, null_as_default};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    OneToOne,
    Group,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Talk,
    Enter,
    Leave,
    #[serde(other)]
    Other,
}

/// Create-or-get request for a room between the given participants.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewChatRoom {
    pub room_name: String,
    pub room_type: RoomType,
    pub participant_ids: Vec<i64>,
}

impl NewChatRoom {
    /// One-to-one room between the signed-in member and another participant.
    #[must_use]
    pub fn one_to_one(
        own_name: &str,
        own_id: MemberId,
        peer_name: &str,
        peer_id: impl Into<i64>,
    ) -> Self {
        Self {
            room_name: format!("{own_name} and {peer_name}'s Chat"),
            room_type: RoomType::OneToOne,
            participant_ids: vec![own_id.get(), peer_id.into()],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub room_id: RoomId,
}

/// Message as stored by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub message_id: Option<i64>,
    pub sender_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub message_type: Option<MessageType>,
    /// Raw timestamp; the backend sends either RFC 3339 or a zone-less local time.
    #[serde(default)]
    pub send_at: Option<String>,
}

impl ChatMessage {
    pub fn is_from(&self, member_id: MemberId) -> bool {
        self.sender_id == member_id.get()
    }

    pub fn sent_at(&self) -> Option<NaiveDateTime> {
        let raw = self.send_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }
}

/// Message written by the signed-in member.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub room_id: RoomId,
    pub sender_id: MemberId,
    pub content: String,
    pub message_type: MessageType,
    pub send_at: DateTime<Utc>,
}

impl NewChatMessage {
    #[must_use]
    pub fn talk(room_id: RoomId, sender_id: MemberId, content: String) -> Self {
        Self {
            room_id,
            sender_id,
            content,
            message_type: MessageType::Talk,
            send_at: Utc::now(),
        }
    }
}
