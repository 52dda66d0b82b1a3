use crate::domain::chat_room::ChatRoom as ChatRoomDomain;
use crate::domain::message::Message as MessageDomain;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of `POST /send-message`. Fields are optional so that absent and
/// empty values produce the same validation error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidSendMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

impl TryFrom<SendMessage> for ValidSendMessage {
    type Error = AppError;

    fn try_from(request: SendMessage) -> Result<Self, Self::Error> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());

        match (present(request.sender_id), present(request.receiver_id), present(request.content)) {
            (Some(sender_id), Some(receiver_id), Some(content)) => Ok(Self { sender_id, receiver_id, content }),
            _ => Err(AppError::BadRequest("Missing required parameters".to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: i64,
    pub member1_id: String,
    pub member2_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ChatRoomDomain> for ChatRoom {
    fn from(room: ChatRoomDomain) -> Self {
        Self { id: room.id, member1_id: room.member1_id, member2_id: room.member2_id, created_at: room.created_at }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomsResponse {
    pub chat_rooms: Vec<ChatRoom>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sender_id: String,
    pub chat_room_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MessageDomain> for Message {
    fn from(message: MessageDomain) -> Self {
        Self {
            id: message.id,
            content: message.content,
            sender_id: message.sender_id,
            chat_room_id: message.chat_room_id,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}
