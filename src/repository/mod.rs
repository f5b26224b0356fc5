use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::chat::{ChatMessage, ChatRoom, NewChatMessage, NewChatRoom};
use crate::domain::client::{ClientDetail, ClientSummary};
use crate::domain::feedback::{FeedbackDates, FeedbackDetail};
use crate::domain::member::{MemberPatch, MemberProfile, PasswordChange};
use crate::domain::types::{ClientId, RoomId};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "client")]
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[cfg(feature = "client")]
pub use http::HttpRepository;

/// Scheduling data visible to a therapist.
#[async_trait]
pub trait ScheduleReader: Send + Sync {
    async fn count_pending_requests(&self) -> RepositoryResult<usize>;
    async fn list_therapist_clients(&self) -> RepositoryResult<Vec<ClientSummary>>;
    async fn get_client_detail(&self, client_id: ClientId) -> RepositoryResult<ClientDetail>;
}

#[async_trait]
pub trait FeedbackReader: Send + Sync {
    async fn list_feedback_dates(&self, child_id: ClientId) -> RepositoryResult<FeedbackDates>;
    async fn get_feedback_detail(
        &self,
        child_id: ClientId,
        date: NaiveDate,
    ) -> RepositoryResult<FeedbackDetail>;
}

#[async_trait]
pub trait ChatReader: Send + Sync {
    async fn list_chat_messages(&self, room_id: RoomId) -> RepositoryResult<Vec<ChatMessage>>;
}

#[async_trait]
pub trait ChatWriter: Send + Sync {
    /// Idempotent upsert keyed by the participant pair.
    async fn create_or_get_room(&self, room: &NewChatRoom) -> RepositoryResult<ChatRoom>;
    async fn send_chat_message(&self, message: &NewChatMessage) -> RepositoryResult<()>;
}

#[async_trait]
pub trait MemberReader: Send + Sync {
    async fn get_me(&self) -> RepositoryResult<MemberProfile>;
}

#[async_trait]
pub trait MemberWriter: Send + Sync {
    async fn update_me(&self, patch: &MemberPatch) -> RepositoryResult<()>;
    async fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()>;
}
