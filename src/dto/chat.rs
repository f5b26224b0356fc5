use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::chat::ChatMessage;
use crate::domain::types::MemberId;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Sent,
    Received,
}

/// A transcript line as rendered in the chat panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatLine {
    pub direction: MessageDirection,
    pub content: String,
    pub sent_at: Option<NaiveDateTime>,
}

impl ChatLine {
    pub fn from_message(message: &ChatMessage, viewer: MemberId) -> Self {
        let direction = if message.is_from(viewer) {
            MessageDirection::Sent
        } else {
            MessageDirection::Received
        };
        Self {
            direction,
            content: message.content.clone(),
            sent_at: message.sent_at(),
        }
    }
}

/// Renders messages in server order.
pub fn transcript(messages: &[ChatMessage], viewer: MemberId) -> Vec<ChatLine> {
    messages
        .iter()
        .map(|message| ChatLine::from_message(message, viewer))
        .collect()
}
