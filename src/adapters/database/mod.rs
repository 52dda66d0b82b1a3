pub mod chat_room_repo;
pub mod message_repo;
pub mod records;
pub mod user_repo;

use crate::config::DatabaseConfig;
use crate::domain::chat_room::ChatRoom;
use crate::domain::message::Message;
use crate::domain::repository::ChatRepository;
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use chat_room_repo::ChatRoomRepository;
use message_repo::MessageRepository;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use user_repo::UserRepository;

pub type DbPool = Pool<Postgres>;

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(config: &DatabaseConfig) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(config.connect_options())
        .await
}

/// Applies pending migrations. Safe to run repeatedly; never drops data.
///
/// # Errors
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// `ChatRepository` backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgChatRepository {
    pool: DbPool,
    users: UserRepository,
    rooms: ChatRoomRepository,
    messages: MessageRepository,
}

impl PgChatRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self {
            pool,
            users: UserRepository::new(),
            rooms: ChatRoomRepository::new(),
            messages: MessageRepository::new(),
        }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn find_users_by_ids(&self, ids: &[&str]) -> Result<Vec<User>> {
        let mut conn = self.pool.acquire().await?;
        self.users.find_by_ids(&mut conn, ids).await
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        self.users.find_by_id(&mut conn, id).await
    }

    async fn find_room_by_member_pair(&self, a: &str, b: &str) -> Result<Option<ChatRoom>> {
        let mut conn = self.pool.acquire().await?;
        self.rooms.find_by_pair(&mut conn, a, b).await
    }

    async fn create_room(&self, member1_id: &str, member2_id: &str) -> Result<ChatRoom> {
        let mut conn = self.pool.acquire().await?;
        self.rooms.create(&mut conn, member1_id, member2_id).await
    }

    async fn create_message(&self, content: &str, sender_id: &str, chat_room_id: i64) -> Result<Message> {
        let mut conn = self.pool.acquire().await?;
        self.messages.create(&mut conn, content, sender_id, chat_room_id).await
    }

    async fn find_rooms_for_user(&self, user_id: &str) -> Result<Vec<ChatRoom>> {
        let mut conn = self.pool.acquire().await?;
        self.rooms.find_for_user(&mut conn, user_id).await
    }

    async fn find_room_by_id(&self, id: i64) -> Result<Option<ChatRoom>> {
        let mut conn = self.pool.acquire().await?;
        self.rooms.find_by_id(&mut conn, id).await
    }

    async fn find_messages_by_room(&self, chat_room_id: i64) -> Result<Vec<Message>> {
        let mut conn = self.pool.acquire().await?;
        self.messages.find_by_room(&mut conn, chat_room_id).await
    }

    async fn count_users(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        self.users.count(&mut conn).await
    }

    async fn insert_user(&self, user: &User) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        self.users.insert(&mut conn, user).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
