use crate::domain::chat_room::ChatRoom;
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct ChatRoomRecord {
    pub(crate) id: i64,
    pub(crate) member1_id: String,
    pub(crate) member2_id: String,
    pub(crate) created_at: OffsetDateTime,
}

impl From<ChatRoomRecord> for ChatRoom {
    fn from(record: ChatRoomRecord) -> Self {
        Self {
            id: record.id,
            member1_id: record.member1_id,
            member2_id: record.member2_id,
            created_at: record.created_at,
        }
    }
}
