use crate::domain::message::Message;
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct MessageRecord {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) sender_id: String,
    pub(crate) chat_room_id: i64,
    pub(crate) created_at: OffsetDateTime,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            content: record.content,
            sender_id: record.sender_id,
            chat_room_id: record.chat_room_id,
            created_at: record.created_at,
        }
    }
}
