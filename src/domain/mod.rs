pub mod chat_room;
pub mod message;
pub mod repository;
pub mod user;
