use crate::domain::chat_room::{ChatRoom, MemberPair};
use crate::domain::message::Message;
use crate::domain::repository::ChatRepository;
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) sent_total: Counter<u64>,
    pub(crate) rooms_created_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dm-server");
        Self {
            sent_total: meter
                .u64_counter("dm_messages_sent_total")
                .with_description("Total messages accepted for storage")
                .build(),
            rooms_created_total: meter
                .u64_counter("dm_chat_rooms_created_total")
                .with_description("Total chat rooms created on first contact")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatService {
    repo: Arc<dyn ChatRepository>,
    metrics: Metrics,
}

impl ChatService {
    #[must_use]
    pub fn new(repo: Arc<dyn ChatRepository>) -> Self {
        Self { repo, metrics: Metrics::new() }
    }

    /// Stores a message from `sender_id` to `receiver_id`, creating their chat
    /// room on first contact.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if sender and receiver are the same user.
    /// Returns `AppError::NotFound` if either user does not exist.
    /// Returns `AppError::Database` if the room or message cannot be stored.
    #[tracing::instrument(
        err(level = "warn"),
        skip(self, content),
        fields(chat_room_id = tracing::field::Empty)
    )]
    pub async fn send_message(&self, sender_id: &str, receiver_id: &str, content: &str) -> Result<Message> {
        if MemberPair::new(sender_id, receiver_id).is_self_pair() {
            return Err(AppError::BadRequest("Cannot send a message to oneself".to_string()));
        }

        let users = self.repo.find_users_by_ids(&[sender_id, receiver_id]).await?;
        if users.len() != 2 {
            return Err(AppError::NotFound("Sender or receiver not found".to_string()));
        }

        let room = self.resolve_room(sender_id, receiver_id).await?;
        tracing::Span::current().record("chat_room_id", room.id);

        match self.repo.create_message(content, sender_id, room.id).await {
            Ok(message) => {
                tracing::debug!(message_id = message.id, "Message stored");
                self.metrics.sent_total.add(1, &[KeyValue::new("status", "success")]);
                Ok(message)
            }
            Err(e) => {
                self.metrics.sent_total.add(1, &[KeyValue::new("status", "failure")]);
                Err(e)
            }
        }
    }

    /// Finds the pair's room or creates it. A concurrent sender may create the
    /// room between our lookup and insert; the unique pair constraint turns
    /// that into a conflict, after which the winner's room is reused.
    async fn resolve_room(&self, sender_id: &str, receiver_id: &str) -> Result<ChatRoom> {
        if let Some(room) = self.repo.find_room_by_member_pair(sender_id, receiver_id).await? {
            return Ok(room);
        }

        match self.repo.create_room(sender_id, receiver_id).await {
            Ok(room) => {
                tracing::info!(chat_room_id = room.id, "Chat room created");
                self.metrics.rooms_created_total.add(1, &[]);
                Ok(room)
            }
            Err(AppError::Conflict(_)) => {
                tracing::debug!("Chat room created concurrently, reusing it");
                self.repo
                    .find_room_by_member_pair(sender_id, receiver_id)
                    .await?
                    .ok_or_else(|| AppError::Internal("Chat room missing after creation conflict".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Lists the rooms a user belongs to.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the user does not exist.
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list_chat_rooms(&self, user_id: &str) -> Result<Vec<ChatRoom>> {
        if self.repo.find_user_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.repo.find_rooms_for_user(user_id).await
    }

    /// Lists a room's messages, oldest first.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the room does not exist.
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list_messages(&self, chat_room_id: i64) -> Result<Vec<Message>> {
        if self.repo.find_room_by_id(chat_room_id).await?.is_none() {
            return Err(AppError::NotFound("Chat room not found".to_string()));
        }

        self.repo.find_messages_by_room(chat_room_id).await
    }
}
