use crate::domain::chat_room::ChatRoom;
use crate::domain::message::Message;
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;

/// Data access needed by the chat service. Implementations must keep at most
/// one room per unordered member pair.
#[async_trait]
pub trait ChatRepository: Send + Sync + std::fmt::Debug {
    /// Returns the users among `ids` that exist. Unknown ids are ignored.
    async fn find_users_by_ids(&self, ids: &[&str]) -> Result<Vec<User>>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Finds the room for `{a, b}`, matching either member order.
    async fn find_room_by_member_pair(&self, a: &str, b: &str) -> Result<Option<ChatRoom>>;

    /// Creates a room with members stored as `(member1_id, member2_id)`.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` if a room for the pair already exists.
    async fn create_room(&self, member1_id: &str, member2_id: &str) -> Result<ChatRoom>;

    async fn create_message(&self, content: &str, sender_id: &str, chat_room_id: i64) -> Result<Message>;

    /// Rooms the user belongs to, ordered by id.
    async fn find_rooms_for_user(&self, user_id: &str) -> Result<Vec<ChatRoom>>;

    async fn find_room_by_id(&self, id: i64) -> Result<Option<ChatRoom>>;

    /// Messages of a room in insertion order.
    async fn find_messages_by_room(&self, chat_room_id: i64) -> Result<Vec<Message>>;

    async fn count_users(&self) -> Result<i64>;

    /// Inserts a user unless the id is taken. Returns whether a row was written.
    async fn insert_user(&self, user: &User) -> Result<bool>;

    /// Cheap round trip used by readiness probes.
    async fn ping(&self) -> Result<()>;
}
