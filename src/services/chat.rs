//! Chat panel between the signed-in member and one client.
//!
//! Opening a panel starts a background task that re-reads the transcript on a
//! fixed interval. Each open bumps a generation counter; results produced for
//! an older generation are dropped, so a closed or replaced panel never shows
//! late responses.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use validator::Validate;

use crate::domain::chat::{ChatMessage, NewChatMessage, NewChatRoom};
use crate::domain::client::ClientSummary;
use crate::domain::member::AuthenticatedUser;
use crate::domain::types::RoomId;
use crate::dto::chat::{ChatLine, transcript};
use crate::forms::chat::ChatMessageForm;
use crate::repository::{ChatReader, ChatWriter};
use crate::services::ServiceResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChatPanelState {
    #[default]
    Closed,
    /// Room exists, first transcript fetch still outstanding.
    Loading { room_id: RoomId },
    Ready {
        room_id: RoomId,
        messages: Vec<ChatMessage>,
    },
    /// Room creation failed; nothing is polled.
    Failed(String),
}

impl ChatPanelState {
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            ChatPanelState::Loading { room_id } | ChatPanelState::Ready { room_id, .. } => {
                Some(*room_id)
            }
            ChatPanelState::Closed | ChatPanelState::Failed(_) => None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        match self {
            ChatPanelState::Ready { messages, .. } => messages,
            _ => &[],
        }
    }
}

/// Publishes transcript results only while `expected` is still current.
struct Publisher {
    state: Arc<watch::Sender<ChatPanelState>>,
    generation: Arc<AtomicU64>,
    expected: u64,
    room_id: RoomId,
}

impl Publisher {
    fn is_current(&self) -> bool {
        self.generation.load(Ordering::Acquire) == self.expected
    }

    /// The generation is checked under the watch lock, the same lock
    /// `ChatPanel::stop` bumps it under.
    fn messages(&self, messages: Vec<ChatMessage>) {
        let room_id = self.room_id;
        let published = self.state.send_if_modified(|state| {
            if !self.is_current() {
                return false;
            }
            *state = ChatPanelState::Ready { room_id, messages };
            true
        });
        if !published {
            log::debug!("Dropping transcript for stale room {room_id}");
        }
    }

    /// A failed first tick still ends the loading state.
    fn failed_tick(&self) {
        let room_id = self.room_id;
        self.state.send_if_modified(|state| {
            if !self.is_current() || !matches!(state, ChatPanelState::Loading { .. }) {
                return false;
            }
            *state = ChatPanelState::Ready {
                room_id,
                messages: Vec::new(),
            };
            true
        });
    }
}

async fn poll_transcript<R>(repo: Arc<R>, period: Duration, publisher: Publisher)
where
    R: ChatReader + ?Sized,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !publisher.is_current() {
            break;
        }
        match repo.list_chat_messages(publisher.room_id).await {
            Ok(messages) => publisher.messages(messages),
            Err(err) => {
                log::warn!(
                    "Polling room {} failed, retrying next tick: {err}",
                    publisher.room_id
                );
                publisher.failed_tick();
            }
        }
    }
}

pub struct ChatPanel<R>
where
    R: ChatReader + ChatWriter + 'static,
{
    repo: Arc<R>,
    user: AuthenticatedUser,
    poll_interval: Duration,
    state: Arc<watch::Sender<ChatPanelState>>,
    generation: Arc<AtomicU64>,
    poller: Option<JoinHandle<()>>,
}

impl<R> ChatPanel<R>
where
    R: ChatReader + ChatWriter + 'static,
{
    pub fn new(repo: Arc<R>, user: AuthenticatedUser, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(ChatPanelState::Closed);
        Self {
            repo,
            user,
            poll_interval,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            poller: None,
        }
    }

    /// Opens (or reopens) the panel for `client` and starts polling.
    pub async fn open(&mut self, client: &ClientSummary) -> ServiceResult<RoomId> {
        let expected = self.stop();

        let request = NewChatRoom::one_to_one(
            &self.user.name,
            self.user.member_id,
            &client.name,
            client.client_id,
        );
        let room = match self.repo.create_or_get_room(&request).await {
            Ok(room) => room,
            Err(err) => {
                log::error!("Failed to open chat room with client {}: {err}", client.client_id);
                self.state.send_replace(ChatPanelState::Failed(err.to_string()));
                return Err(err.into());
            }
        };

        log::info!("Opened chat room {} with {}", room.room_id, client.name);
        self.state.send_replace(ChatPanelState::Loading {
            room_id: room.room_id,
        });

        let publisher = Publisher {
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
            expected,
            room_id: room.room_id,
        };
        self.poller = Some(tokio::spawn(poll_transcript(
            Arc::clone(&self.repo),
            self.poll_interval,
            publisher,
        )));

        Ok(room.room_id)
    }

    /// Sends `content` to the open room and refreshes the transcript.
    ///
    /// Returns `false` without touching the network when the content is blank
    /// or no room is open.
    pub async fn send(&self, content: &str) -> ServiceResult<bool> {
        let form = ChatMessageForm {
            content: content.to_string(),
        };
        if form.validate().is_err() {
            return Ok(false);
        }
        let Some(room_id) = self.room_id() else {
            return Ok(false);
        };

        let publisher = Publisher {
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
            expected: self.generation.load(Ordering::Acquire),
            room_id,
        };

        let message = NewChatMessage::talk(room_id, self.user.member_id, form.content);
        self.repo.send_chat_message(&message).await.map_err(|err| {
            log::error!("Failed to send message to room {room_id}: {err}");
            err
        })?;

        match self.repo.list_chat_messages(room_id).await {
            Ok(messages) => publisher.messages(messages),
            Err(err) => log::warn!("Failed to refresh room {room_id} after sending: {err}"),
        }
        Ok(true)
    }

    /// Stops polling and forgets the room.
    pub fn close(&mut self) {
        self.stop();
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatPanelState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ChatPanelState {
        self.state.borrow().clone()
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.state.borrow().room_id()
    }

    pub fn is_open(&self) -> bool {
        self.poller.is_some()
    }

    /// Current messages as seen by the signed-in member.
    pub fn transcript(&self) -> Vec<ChatLine> {
        transcript(self.state.borrow().messages(), self.user.member_id)
    }

    /// Aborts the running poller, resets the state to `Closed` and returns
    /// the new generation.
    fn stop(&mut self) -> u64 {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        let generation = &self.generation;
        let mut current = 0;
        self.state.send_modify(|state| {
            current = generation.fetch_add(1, Ordering::AcqRel) + 1;
            *state = ChatPanelState::Closed;
        });
        current
    }
}

impl<R> Drop for ChatPanel<R>
where
    R: ChatReader + ChatWriter + 'static,
{
    fn drop(&mut self) {
        self.stop();
    }
}
