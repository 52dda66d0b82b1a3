use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sender_id: String,
    pub chat_room_id: i64,
    pub created_at: OffsetDateTime,
}
