pub mod chat_room;
pub mod message;
pub mod user;

pub use chat_room::ChatRoomRecord;
pub use message::MessageRecord;
pub use user::UserRecord;
