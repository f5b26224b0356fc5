//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;

use crate::domain::chat::{ChatMessage, ChatRoom, NewChatMessage, NewChatRoom};
use crate::domain::client::{ClientDetail, ClientSummary};
use crate::domain::feedback::{FeedbackDates, FeedbackDetail};
use crate::domain::member::{MemberPatch, MemberProfile, PasswordChange};
use crate::domain::types::{ClientId, RoomId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ChatReader, ChatWriter, FeedbackReader, MemberReader, MemberWriter, ScheduleReader,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl ScheduleReader for Repository {
        async fn count_pending_requests(&self) -> RepositoryResult<usize>;
        async fn list_therapist_clients(&self) -> RepositoryResult<Vec<ClientSummary>>;
        async fn get_client_detail(&self, client_id: ClientId) -> RepositoryResult<ClientDetail>;
    }

    #[async_trait]
    impl FeedbackReader for Repository {
        async fn list_feedback_dates(&self, child_id: ClientId) -> RepositoryResult<FeedbackDates>;
        async fn get_feedback_detail(
            &self,
            child_id: ClientId,
            date: NaiveDate,
        ) -> RepositoryResult<FeedbackDetail>;
    }

    #[async_trait]
    impl ChatReader for Repository {
        async fn list_chat_messages(&self, room_id: RoomId) -> RepositoryResult<Vec<ChatMessage>>;
    }

    #[async_trait]
    impl ChatWriter for Repository {
        async fn create_or_get_room(&self, room: &NewChatRoom) -> RepositoryResult<ChatRoom>;
        async fn send_chat_message(&self, message: &NewChatMessage) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl MemberReader for Repository {
        async fn get_me(&self) -> RepositoryResult<MemberProfile>;
    }

    #[async_trait]
    impl MemberWriter for Repository {
        async fn update_me(&self, patch: &MemberPatch) -> RepositoryResult<()>;
        async fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()>;
    }
}
