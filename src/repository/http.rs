//! REST adapter for the platform backend.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::chat::{ChatMessage, ChatRoom, NewChatMessage, NewChatRoom};
use crate::domain::client::{ClientDetail, ClientSummary};
use crate::domain::feedback::{FeedbackDates, FeedbackDetail};
use crate::domain::member::{MemberPatch, MemberProfile, PasswordChange};
use crate::domain::types::{ClientId, RoomId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ChatReader, ChatWriter, FeedbackReader, MemberReader, MemberWriter, ScheduleReader,
};

/// Backend client authenticated as a single member.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpRepository {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> RepositoryResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| RepositoryError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.endpoint(path))
            .bearer_auth(&self.access_token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .bearer_auth(&self.access_token)
    }

    fn patch(&self, path: &str) -> RequestBuilder {
        self.client
            .patch(self.endpoint(path))
            .bearer_auth(&self.access_token)
    }

    async fn read_body(request: RequestBuilder) -> RepositoryResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::debug!("Backend responded with {status}: {body}");
            return Err(RepositoryError::from_status(status.as_u16(), body));
        }

        Ok(body)
    }

    /// Decodes the body, treating an empty or `null` payload as the default value.
    async fn request_json<T>(request: RequestBuilder) -> RepositoryResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let body = Self::read_body(request).await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    async fn request_required<T: DeserializeOwned>(request: RequestBuilder) -> RepositoryResult<T> {
        let body = Self::read_body(request).await?;
        Ok(serde_json::from_str(body.trim())?)
    }

    async fn request_status_only(request: RequestBuilder) -> RepositoryResult<()> {
        Self::read_body(request).await.map(|_| ())
    }
}

#[async_trait]
impl ScheduleReader for HttpRepository {
    async fn count_pending_requests(&self) -> RepositoryResult<usize> {
        let pending: Vec<Value> = Self::request_json(self.get("/schedule/pending")).await?;
        Ok(pending.len())
    }

    async fn list_therapist_clients(&self) -> RepositoryResult<Vec<ClientSummary>> {
        Self::request_json(self.get("/schedule/therapist/client")).await
    }

    async fn get_client_detail(&self, client_id: ClientId) -> RepositoryResult<ClientDetail> {
        let request = self
            .get("/schedule/therapist/client/detail")
            .query(&[("clientId", client_id.get())]);
        Self::request_json(request).await
    }
}

#[async_trait]
impl FeedbackReader for HttpRepository {
    async fn list_feedback_dates(&self, child_id: ClientId) -> RepositoryResult<FeedbackDates> {
        let request = self
            .get("/session-feedback/dates")
            .query(&[("childId", child_id.get())]);
        Self::request_json(request).await
    }

    async fn get_feedback_detail(
        &self,
        child_id: ClientId,
        date: NaiveDate,
    ) -> RepositoryResult<FeedbackDetail> {
        let request = self.get("/session-feedback/detail").query(&[
            ("childId", child_id.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ]);
        Self::request_required(request).await
    }
}

#[async_trait]
impl ChatReader for HttpRepository {
    async fn list_chat_messages(&self, room_id: RoomId) -> RepositoryResult<Vec<ChatMessage>> {
        Self::request_json(self.get(&format!("/chat/room/{room_id}/messages"))).await
    }
}

#[async_trait]
impl ChatWriter for HttpRepository {
    async fn create_or_get_room(&self, room: &NewChatRoom) -> RepositoryResult<ChatRoom> {
        Self::request_required(self.post("/chat/room").json(room)).await
    }

    async fn send_chat_message(&self, message: &NewChatMessage) -> RepositoryResult<()> {
        Self::request_status_only(self.post("/chat/room/message").json(message)).await
    }
}

#[async_trait]
impl MemberReader for HttpRepository {
    async fn get_me(&self) -> RepositoryResult<MemberProfile> {
        Self::request_json(self.get("/api/v1/members/me")).await
    }
}

#[async_trait]
impl MemberWriter for HttpRepository {
    async fn update_me(&self, patch: &MemberPatch) -> RepositoryResult<()> {
        Self::request_status_only(self.patch("/api/v1/members/me").json(patch)).await
    }

    async fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()> {
        Self::request_status_only(self.patch("/api/v1/members/me/password").json(change)).await
    }
}
